use crate::api::{LoginResult, UserDto};
use crate::constants::DEFAULT_DISPLAY_NAME;
use crate::domain::{
    parse_timestamp, session_label, NotificationPreferences, PrivacySettings, SessionRecord,
};

// Server payloads treat 0 and "" as "not set".

fn set_code(code: Option<i64>) -> Option<i64> {
    code.filter(|c| *c != 0)
}

fn set_small(code: Option<i32>) -> Option<i32> {
    code.filter(|c| *c != 0)
}

fn set_text(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Dates are stored as RFC 3339 when they parse, verbatim otherwise
fn set_date(value: Option<&String>) -> Option<String> {
    set_text(value).map(|raw| {
        parse_timestamp(&raw)
            .map(|ts| ts.to_rfc3339())
            .unwrap_or(raw)
    })
}

/// Copy the donor fields shared by the login and profile payloads
fn fill_donor_fields(record: &mut SessionRecord, user: &UserDto) {
    let blood_group = set_code(user.donor_blood_group);
    let exclude = user.excluded_from_public_portal();
    let anonymous = user.donor_want_to_stay_anonymous.unwrap_or(false);

    record.blood_type = blood_group.map(session_label);
    record.donor_blood_group = blood_group;
    record.donor_correlation_id = set_text(user.donor_correlation_id.as_ref());
    record.donor_want_to_stay_anonymous = anonymous;
    record.donor_exclude_from_public_portal = exclude;
    record.donor_availability = set_small(user.donor_availability);
    record.donor_contact_method = set_small(user.donor_contact_method);
    record.donor_name = set_text(user.donor_name.as_ref());
    record.donor_nin = set_text(user.donor_nin.as_ref());
    record.donor_tel = set_text(user.donor_tel.as_ref());
    record.donor_notes_for_btc = set_text(user.donor_notes_for_btc.as_ref());
    record.commune_id = set_code(user.commune_id);
    record.wilaya = user
        .wilaya
        .as_ref()
        .and_then(|w| set_text(w.name.as_ref()));
    record.notification_preferences = NotificationPreferences::default();
    record.privacy_settings = PrivacySettings::from_donor_flags(exclude, anonymous);
}

/// Session record built from a successful login
pub fn record_from_login(email: &str, login: &LoginResult) -> SessionRecord {
    let user = login.user.clone().unwrap_or_default();
    let local_part = email.split('@').next().unwrap_or(email);
    let name = set_text(user.donor_name.as_ref()).unwrap_or_else(|| local_part.to_string());

    let mut record =
        SessionRecord::new(login.user_id.clone(), name, email).with_token(login.token.clone());
    fill_donor_fields(&mut record, &user);
    record.donor_birth_date = set_text(user.donor_birth_date.as_ref());
    record.donor_last_donation_date = set_text(user.donor_last_donation_date.as_ref());
    record
}

/// Session record rebuilt from `GET /user`, replacing the previous one
pub fn record_from_profile(user: &UserDto, user_id: &str, token: Option<String>) -> SessionRecord {
    let id = set_text(user.donor_correlation_id.as_ref()).unwrap_or_else(|| user_id.to_string());
    let name = user
        .full_name()
        .or_else(|| set_text(user.username.as_ref()))
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
    let email = user.email.clone().unwrap_or_default();

    let mut record = SessionRecord::new(id, name, email);
    record.token = token;
    fill_donor_fields(&mut record, user);
    record.donor_birth_date = set_date(user.donor_birth_date.as_ref());
    record.donor_last_donation_date = set_date(user.donor_last_donation_date.as_ref());
    record
}
