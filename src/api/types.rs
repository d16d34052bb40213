use serde::{Deserialize, Serialize};

// Wire shapes of the remote REST API. Every field is optional: the backend
// omits freely and the view mapping supplies the defaults.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WilayaDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommuneDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub wilaya_id: Option<i64>,
}

/// A user as returned by `/user`, `/Users` and inside the login response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDto {
    pub id: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile_picture_url: Option<String>,
    pub donor_correlation_id: Option<String>,
    pub donor_want_to_stay_anonymous: Option<bool>,
    pub donor_exclude_from_public_portal: Option<bool>,
    /// Spelling used by the listing and profile endpoints
    pub donor_excluded_from_public_portal: Option<bool>,
    pub donor_availability: Option<i32>,
    pub donor_contact_method: Option<i32>,
    pub donor_name: Option<String>,
    pub donor_birth_date: Option<String>,
    pub donor_blood_group: Option<i64>,
    #[serde(rename = "donorNIN")]
    pub donor_nin: Option<String>,
    pub donor_tel: Option<String>,
    #[serde(rename = "donorNotesForBTC")]
    pub donor_notes_for_btc: Option<String>,
    pub donor_last_donation_date: Option<String>,
    pub donor_donation_count: Option<u32>,
    pub donor_can_donate_now: Option<bool>,
    pub commune_id: Option<i64>,
    pub wilaya: Option<WilayaDto>,
}

impl UserDto {
    /// Whether the payload names somebody; an all-empty object does not
    pub fn has_identity(&self) -> bool {
        [
            &self.id,
            &self.username,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.donor_correlation_id,
            &self.donor_name,
        ]
        .into_iter()
        .any(|field| field.as_deref().is_some_and(|value| !value.is_empty()))
    }

    /// Either spelling of the public-portal exclusion flag
    pub fn excluded_from_public_portal(&self) -> bool {
        self.donor_exclude_from_public_portal
            .or(self.donor_excluded_from_public_portal)
            .unwrap_or(false)
    }

    /// `first last` when both parts are present and non-empty
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Some(format!("{} {}", first, last))
            }
            _ => None,
        }
    }
}

/// `GET /user` answers either `{ "user": {...} }` or the bare user.
///
/// Any other object (`{"user": null}`, `{}`, a status message) lands in
/// `Bare` with no identifying field and yields no user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserProfileResponse {
    Wrapped { user: UserDto },
    Bare(UserDto),
}

impl UserProfileResponse {
    pub fn into_user(self) -> Option<UserDto> {
        match self {
            UserProfileResponse::Wrapped { user } => Some(user),
            UserProfileResponse::Bare(user) => user.has_identity().then_some(user),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoginResponseDto {
    #[serde(rename = "jwToken")]
    pub jw_token: Option<String>,
    #[serde(rename = "userDTO")]
    pub user_dto: Option<UserDto>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Normalized login result
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub token: String,
    pub user_id: String,
    pub user: Option<UserDto>,
}

/// Registration form sent to `/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub blood_type: String,
    pub wilaya: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_donation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestSummaryDto {
    pub id: Option<String>,
    pub evolution_status: Option<i32>,
}

/// Blood transfusion center
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BtcDto {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
    pub wilaya: Option<WilayaDto>,
    pub wilaya_id: Option<i64>,
    pub blood_donation_requests: Option<Vec<RequestSummaryDto>>,
    pub logged_user_subscribed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BloodDonationRequestDto {
    pub id: Option<String>,
    pub blood_group: Option<i64>,
    pub deadline: Option<String>,
    pub request_due_date: Option<String>,
    pub priority: Option<i64>,
    pub notes: Option<String>,
    pub more_details: Option<String>,
    pub units_needed: Option<u32>,
    pub requested_qty: Option<u32>,
    pub contact_person: Option<String>,
    pub evolution_status: Option<i32>,
    pub blood_tansfusion_center: Option<BtcDto>,
}

/// Body of `POST /BloodDonationRequests`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBloodRequest {
    pub blood_group: i64,
    pub priority: i64,
    pub request_due_date: String,
    pub requested_qty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_details: Option<String>,
}

/// Body of `POST /Pledges`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPledge {
    pub blood_donation_request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pledge_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pledge_notes: Option<String>,
}

/// Query filter for `GET /Pledges`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PledgeFilter {
    pub evolution_status: Option<i32>,
    pub pagination_take: Option<u32>,
    pub pagination_skip: Option<u32>,
}

impl PledgeFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.evolution_status {
            query.push(("evolutionStatus", status.to_string()));
        }
        if let Some(take) = self.pagination_take {
            query.push(("paginationTake", take.to_string()));
        }
        if let Some(skip) = self.pagination_skip {
            query.push(("paginationSkip", skip.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PledgeDto {
    pub id: Option<String>,
    pub blood_donation_request_id: Option<String>,
    pub pledge_date: Option<String>,
    pub pledge_notes: Option<String>,
    pub evolution_status: Option<i32>,
    pub created_at: Option<String>,
    pub blood_donation_request: Option<BloodDonationRequestDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonationDto {
    pub id: Option<String>,
    #[serde(alias = "donationDate")]
    pub date: Option<String>,
    pub hospital_name: Option<String>,
    pub blood_tansfusion_center: Option<BtcDto>,
    pub blood_group: Option<i64>,
    pub blood_type: Option<String>,
    #[serde(alias = "volume")]
    pub amount: Option<u32>,
    pub donation_type: Option<i64>,
    pub status: Option<String>,
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonationStats {
    pub total_donations: u32,
    pub total_volume: u32,
    pub last_donation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationDto {
    pub id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub hospital_id: Option<String>,
    pub hospital_name: Option<String>,
    #[serde(alias = "createdAt")]
    pub timestamp: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyLevels {
    pub high: bool,
    pub medium: bool,
    pub low: bool,
}

impl Default for UrgencyLevels {
    fn default() -> Self {
        Self {
            high: true,
            medium: true,
            low: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationMethods {
    pub push: bool,
    pub email: bool,
    pub sms: bool,
}

impl Default for NotificationMethods {
    fn default() -> Self {
        Self {
            push: true,
            email: false,
            sms: false,
        }
    }
}

/// Server-side notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub enable_notifications: bool,
    pub subscribed_hospitals: Vec<String>,
    pub urgency_levels: UrgencyLevels,
    pub notification_methods: NotificationMethods,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            subscribed_hospitals: Vec::new(),
            urgency_levels: UrgencyLevels::default(),
            notification_methods: NotificationMethods::default(),
        }
    }
}

impl NotificationSettings {
    /// Add or remove a center from the subscribed set
    pub fn toggle_hospital(&mut self, hospital_id: &str) -> bool {
        if let Some(pos) = self.subscribed_hospitals.iter().position(|h| h == hospital_id) {
            self.subscribed_hospitals.remove(pos);
            false
        } else {
            self.subscribed_hospitals.push(hospital_id.to_string());
            true
        }
    }
}

/// Body of `PATCH /donor/profile`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_blood_group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_contact_method: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_want_to_stay_anonymous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_excluded_from_public_portal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wilaya_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_response_shapes() {
        let wrapped: UserProfileResponse =
            serde_json::from_str(r#"{"user":{"firstName":"Amina","donorBloodGroup":3}}"#).unwrap();
        let user = wrapped.into_user().unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Amina"));
        assert_eq!(user.donor_blood_group, Some(3));

        let bare: UserProfileResponse =
            serde_json::from_str(r#"{"firstName":"Karim","lastName":"Haddad"}"#).unwrap();
        assert_eq!(bare.into_user().unwrap().full_name().as_deref(), Some("Karim Haddad"));
    }

    #[test]
    fn test_profile_response_without_user() {
        for body in [r#"{"user":null}"#, "{}", r#"{"message":"ok"}"#] {
            let response: UserProfileResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.into_user(), None, "body {}", body);
        }
    }

    #[test]
    fn test_login_response_field_names() {
        let dto: LoginResponseDto = serde_json::from_str(
            r#"{"jwToken":"abc","userId":"42","userDTO":{"donorName":"Sami","donorNIN":"1"}}"#,
        )
        .unwrap();
        assert_eq!(dto.jw_token.as_deref(), Some("abc"));
        assert_eq!(dto.user_id.as_deref(), Some("42"));
        let user = dto.user_dto.unwrap();
        assert_eq!(user.donor_name.as_deref(), Some("Sami"));
        assert_eq!(user.donor_nin.as_deref(), Some("1"));
    }

    #[test]
    fn test_exclusion_flag_spellings() {
        let a: UserDto = serde_json::from_str(r#"{"donorExcludeFromPublicPortal":true}"#).unwrap();
        let b: UserDto = serde_json::from_str(r#"{"donorExcludedFromPublicPortal":true}"#).unwrap();
        let c: UserDto = serde_json::from_str("{}").unwrap();
        assert!(a.excluded_from_public_portal());
        assert!(b.excluded_from_public_portal());
        assert!(!c.excluded_from_public_portal());
    }

    #[test]
    fn test_pledge_filter_query() {
        let filter = PledgeFilter {
            evolution_status: Some(1),
            pagination_take: Some(20),
            pagination_skip: None,
        };
        assert_eq!(
            filter.to_query(),
            vec![("evolutionStatus", "1".to_string()), ("paginationTake", "20".to_string())]
        );
        assert!(PledgeFilter::default().to_query().is_empty());
    }

    #[test]
    fn test_notification_settings_toggle() {
        let mut settings = NotificationSettings::default();
        assert!(settings.toggle_hospital("h1"));
        assert_eq!(settings.subscribed_hospitals, vec!["h1".to_string()]);
        assert!(!settings.toggle_hospital("h1"));
        assert!(settings.subscribed_hospitals.is_empty());
    }

    #[test]
    fn test_profile_patch_omits_unset_fields() {
        let patch = DonorProfilePatch {
            donor_tel: Some("0555".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"donorTel": "0555"}));
    }
}
