use serde::{Deserialize, Serialize};

use super::blood_group::{session_label, BloodGroup};

/// Notification toggles kept alongside the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub enable_notifications: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    #[serde(default)]
    pub subscribed_hospitals: Vec<String>,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            email_notifications: true,
            sms_notifications: true,
            subscribed_hospitals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub show_on_public_list: bool,
    pub is_anonymous: bool,
}

impl PrivacySettings {
    pub fn from_donor_flags(exclude_from_public_portal: bool, stay_anonymous: bool) -> Self {
        Self {
            show_on_public_list: !exclude_from_public_portal,
            is_anonymous: stay_anonymous,
        }
    }
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self::from_donor_flags(false, false)
    }
}

/// Normalized representation of the authenticated user.
///
/// The same shape is kept in memory and written to the general store; the
/// token is stripped before writing and re-attached from the protected store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub wilaya: Option<String>,

    #[serde(default)]
    pub donor_correlation_id: Option<String>,
    #[serde(default)]
    pub donor_want_to_stay_anonymous: bool,
    #[serde(default)]
    pub donor_exclude_from_public_portal: bool,
    #[serde(default)]
    pub donor_availability: Option<i32>,
    #[serde(default)]
    pub donor_contact_method: Option<i32>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_birth_date: Option<String>,
    #[serde(default)]
    pub donor_blood_group: Option<i64>,
    #[serde(default, rename = "donorNIN")]
    pub donor_nin: Option<String>,
    #[serde(default)]
    pub donor_tel: Option<String>,
    #[serde(default, rename = "donorNotesForBTC")]
    pub donor_notes_for_btc: Option<String>,
    #[serde(default)]
    pub donor_last_donation_date: Option<String>,
    #[serde(default)]
    pub commune_id: Option<i64>,

    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
    #[serde(default)]
    pub privacy_settings: PrivacySettings,
}

impl SessionRecord {
    /// Minimal record with default preferences
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            token: None,
            blood_type: None,
            wilaya: None,
            donor_correlation_id: None,
            donor_want_to_stay_anonymous: false,
            donor_exclude_from_public_portal: false,
            donor_availability: None,
            donor_contact_method: None,
            donor_name: None,
            donor_birth_date: None,
            donor_blood_group: None,
            donor_nin: None,
            donor_tel: None,
            donor_notes_for_btc: None,
            donor_last_donation_date: None,
            commune_id: None,
            notification_preferences: NotificationPreferences::default(),
            privacy_settings: PrivacySettings::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Parsed blood group, if the record carries a mapped one
    pub fn blood_group(&self) -> Option<BloodGroup> {
        self.donor_blood_group
            .and_then(BloodGroup::from_code)
            .or_else(|| self.blood_type.as_deref().and_then(BloodGroup::from_label))
    }

    /// Merge a partial update field by field; untouched fields are kept.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            email,
            wilaya,
            donor_availability,
            donor_contact_method,
            donor_name,
            donor_birth_date,
            donor_blood_group,
            donor_tel,
            donor_notes_for_btc,
            donor_last_donation_date,
            donor_want_to_stay_anonymous,
            donor_exclude_from_public_portal,
            commune_id,
            notification_preferences,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = wilaya {
            self.wilaya = Some(v);
        }
        if let Some(v) = donor_availability {
            self.donor_availability = Some(v);
        }
        if let Some(v) = donor_contact_method {
            self.donor_contact_method = Some(v);
        }
        if let Some(v) = donor_name {
            self.donor_name = Some(v);
        }
        if let Some(v) = donor_birth_date {
            self.donor_birth_date = Some(v);
        }
        if let Some(code) = donor_blood_group {
            // label is derived, never set independently
            self.donor_blood_group = Some(code);
            self.blood_type = Some(session_label(code));
        }
        if let Some(v) = donor_tel {
            self.donor_tel = Some(v);
        }
        if let Some(v) = donor_notes_for_btc {
            self.donor_notes_for_btc = Some(v);
        }
        if let Some(v) = donor_last_donation_date {
            self.donor_last_donation_date = Some(v);
        }
        if let Some(v) = donor_want_to_stay_anonymous {
            self.donor_want_to_stay_anonymous = v;
            self.privacy_settings.is_anonymous = v;
        }
        if let Some(v) = donor_exclude_from_public_portal {
            self.donor_exclude_from_public_portal = v;
            self.privacy_settings.show_on_public_list = !v;
        }
        if let Some(v) = commune_id {
            self.commune_id = Some(v);
        }
        if let Some(v) = notification_preferences {
            self.notification_preferences = v;
        }
    }
}

/// Explicit set of fields a profile update may touch.
///
/// `None` means "leave as is". Identity and token are not updatable here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub wilaya: Option<String>,
    pub donor_availability: Option<i32>,
    pub donor_contact_method: Option<i32>,
    pub donor_name: Option<String>,
    pub donor_birth_date: Option<String>,
    pub donor_blood_group: Option<i64>,
    pub donor_tel: Option<String>,
    pub donor_notes_for_btc: Option<String>,
    pub donor_last_donation_date: Option<String>,
    pub donor_want_to_stay_anonymous: Option<bool>,
    pub donor_exclude_from_public_portal: Option<bool>,
    pub commune_id: Option<i64>,
    pub notification_preferences: Option<NotificationPreferences>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> SessionRecord {
        let mut record = SessionRecord::new("u1", "Amina Benali", "amina@example.dz").with_token("t1");
        record.wilaya = Some("Alger".to_string());
        record.donor_tel = Some("0555000000".to_string());
        record.donor_blood_group = Some(7);
        record.blood_type = Some("O+".to_string());
        record
    }

    #[test]
    fn test_partial_update_preserves_untouched_fields() {
        let before = sample();
        let mut after = before.clone();
        after.apply(ProfileUpdate {
            donor_tel: Some("0666111111".to_string()),
            ..Default::default()
        });

        let mut expected = before;
        expected.donor_tel = Some("0666111111".to_string());
        assert_eq!(after, expected);
    }

    #[test]
    fn test_blood_group_update_rederives_label() {
        let mut record = sample();
        record.apply(ProfileUpdate {
            donor_blood_group: Some(2),
            ..Default::default()
        });
        assert_eq!(record.blood_type.as_deref(), Some("AB-"));
        assert_eq!(record.blood_group(), Some(BloodGroup::AbNegative));

        record.apply(ProfileUpdate {
            donor_blood_group: Some(99),
            ..Default::default()
        });
        assert_eq!(record.blood_type.as_deref(), Some("Inconnu"));
        assert_eq!(record.blood_group(), None);
    }

    #[test]
    fn test_privacy_flags_stay_in_sync() {
        let mut record = sample();
        record.apply(ProfileUpdate {
            donor_exclude_from_public_portal: Some(true),
            donor_want_to_stay_anonymous: Some(true),
            ..Default::default()
        });
        assert!(!record.privacy_settings.show_on_public_list);
        assert!(record.privacy_settings.is_anonymous);
        assert!(record.donor_exclude_from_public_portal);
    }

    #[test]
    fn test_serialized_shape() {
        let record = sample();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["donorBloodGroup"], 7);
        assert_eq!(json["notificationPreferences"]["enableNotifications"], true);
        assert_eq!(json["privacySettings"]["showOnPublicList"], true);

        let mut tokenless = record.clone();
        tokenless.token = None;
        let json = serde_json::to_value(&tokenless).unwrap();
        assert!(json.get("token").is_none());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate {
            commune_id: Some(16),
            ..Default::default()
        }
        .is_empty());
    }
}
