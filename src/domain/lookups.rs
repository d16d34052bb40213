// Static code tables shared with the backend.

/// Preferred way of contacting a donor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Phone = 1,
    TextMessage = 2,
    Any = 3,
}

impl ContactMethod {
    pub const ALL: [ContactMethod; 3] = [
        ContactMethod::Phone,
        ContactMethod::TextMessage,
        ContactMethod::Any,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| *m as i64 == code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactMethod::Phone => "Appel téléphonique",
            ContactMethod::TextMessage => "Message texte",
            ContactMethod::Any => "Tous les moyens",
        }
    }
}

/// Priority attached to a blood request by the issuing center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPriority {
    Low = 1,
    Standard = 2,
    Critical = 3,
}

impl RequestPriority {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(RequestPriority::Low),
            2 => Some(RequestPriority::Standard),
            3 => Some(RequestPriority::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestPriority::Low => "low",
            RequestPriority::Standard => "standard",
            RequestPriority::Critical => "critical",
        }
    }
}

/// Kind of donation collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationType {
    WholeBlood = 1,
    Platelets = 2,
    Plasma = 3,
}

impl DonationType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DonationType::WholeBlood),
            2 => Some(DonationType::Platelets),
            3 => Some(DonationType::Plasma),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DonationType::WholeBlood => "Sang total",
            DonationType::Platelets => "Plaquettes",
            DonationType::Plasma => "Plasma",
        }
    }
}
