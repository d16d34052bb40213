use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label used by the session record when the server sends an unmapped code
pub const UNKNOWN_BLOOD_TYPE: &str = "Inconnu";

/// Label used by list views when the server sends an unmapped code
pub const UNKNOWN_BLOOD_TYPE_SHORT: &str = "?";

/// The eight ABO/Rh groups, numbered the way the backend numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BloodGroup {
    AbPositive = 1,
    AbNegative = 2,
    APositive = 3,
    ANegative = 4,
    BPositive = 5,
    BNegative = 6,
    OPositive = 7,
    ONegative = 8,
}

impl BloodGroup {
    /// All groups in backend code order
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() as i64 == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(label))
    }

    /// Groups whose blood a recipient of this group can receive
    pub fn compatible_donors(self) -> &'static [BloodGroup] {
        use BloodGroup::*;
        match self {
            APositive => &[APositive, ANegative, OPositive, ONegative],
            ANegative => &[ANegative, ONegative],
            BPositive => &[BPositive, BNegative, OPositive, ONegative],
            BNegative => &[BNegative, ONegative],
            AbPositive => &[
                AbPositive, AbNegative, APositive, ANegative, BPositive, BNegative, OPositive,
                ONegative,
            ],
            AbNegative => &[AbNegative, ANegative, BNegative, ONegative],
            OPositive => &[OPositive, ONegative],
            ONegative => &[ONegative],
        }
    }

    pub fn can_receive_from(self, donor: BloodGroup) -> bool {
        self.compatible_donors().contains(&donor)
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BloodGroup> for u8 {
    fn from(group: BloodGroup) -> Self {
        group.code()
    }
}

impl TryFrom<u8> for BloodGroup {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BloodGroup::from_code(code as i64).ok_or_else(|| format!("unknown blood group code {}", code))
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    /// Accepts either a label ("O+") or a backend code ("7")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(group) = BloodGroup::from_label(s) {
            return Ok(group);
        }
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(BloodGroup::from_code)
            .ok_or_else(|| format!("unknown blood group '{}'", s))
    }
}

/// Session-record label for a code; unmapped codes yield `Inconnu`
pub fn session_label(code: i64) -> String {
    BloodGroup::from_code(code)
        .map(|g| g.label())
        .unwrap_or(UNKNOWN_BLOOD_TYPE)
        .to_string()
}

/// List-view label for an optional code; missing or unmapped codes yield `?`
pub fn view_label(code: Option<i64>) -> String {
    code.and_then(BloodGroup::from_code)
        .map(|g| g.label())
        .unwrap_or(UNKNOWN_BLOOD_TYPE_SHORT)
        .to_string()
}

/// Normalize a blood type that may arrive as a label or a numeric code.
/// Anything unrecognized is passed through untouched.
pub fn display_blood_type(raw: &str) -> String {
    if raw.contains('+') || raw.contains('-') {
        return raw.to_string();
    }
    match raw.trim().parse::<i64>().ok().and_then(BloodGroup::from_code) {
        Some(group) => group.label().to_string(),
        None => raw.to_string(),
    }
}
