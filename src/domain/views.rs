use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::blood_group::{display_blood_type, view_label, UNKNOWN_BLOOD_TYPE_SHORT};
use super::lookups::{DonationType, RequestPriority};
use super::session::PrivacySettings;
use crate::api::{
    BloodDonationRequestDto, BtcDto, DonationDto, DonationStats, NotificationDto, PledgeDto,
    UserDto,
};
use crate::constants::{
    ANONYMOUS_DONOR, CRITICAL_HORIZON_HOURS, DEFAULT_BLOOD_BANK_CAPACITY, DEFAULT_CONTACT_PERSON,
    DEFAULT_OPEN_HOURS, DEFAULT_SPECIALTY, DONOR_BADGES, PLEDGE_STATUS_CANCELLED,
    PLEDGE_STATUS_COMPLETED, REQUEST_STATUS_CLOSED, STANDARD_DONATION_VOLUME_ML, UNKNOWN_HOSPITAL,
    UNSPECIFIED_LOCATION, URGENT_HORIZON_HOURS,
};

/// Parse the timestamp shapes the backend emits: RFC 3339, naive ISO, or a bare date
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Urgent,
    Standard,
}

impl Urgency {
    /// Urgency from time left before the deadline; unparseable deadlines are standard
    pub fn from_deadline(deadline: &str, now: DateTime<Utc>) -> Self {
        let Some(deadline) = parse_timestamp(deadline) else {
            return Urgency::Standard;
        };
        let hours = (deadline - now).num_minutes() as f64 / 60.0;
        if hours <= CRITICAL_HORIZON_HOURS as f64 {
            Urgency::Critical
        } else if hours <= URGENT_HORIZON_HOURS as f64 {
            Urgency::Urgent
        } else {
            Urgency::Standard
        }
    }

    /// Priority set by the center wins; otherwise the deadline decides
    pub fn for_request(priority: Option<i64>, deadline: &str, now: DateTime<Utc>) -> Self {
        match priority.and_then(RequestPriority::from_code) {
            Some(RequestPriority::Critical) => Urgency::Critical,
            Some(RequestPriority::Standard) => Urgency::Urgent,
            Some(RequestPriority::Low) => Urgency::Standard,
            None => Urgency::from_deadline(deadline, now),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::Urgent => "urgent",
            Urgency::Standard => "standard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Critical => "Critique",
            Urgency::Urgent => "Urgent",
            Urgency::Standard => "Standard",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" | "critique" => Ok(Urgency::Critical),
            "urgent" => Ok(Urgency::Urgent),
            "standard" | "normal" => Ok(Urgency::Standard),
            other => Err(format!("unknown urgency '{}'", other)),
        }
    }
}

/// Human label for the time left before `deadline`, counted in started days
pub fn deadline_label(deadline: &str, now: DateTime<Utc>) -> String {
    let Some(deadline) = parse_timestamp(deadline) else {
        return "Date invalide".to_string();
    };
    let millis = (deadline - now).num_milliseconds() as f64;
    let days = (millis / 86_400_000.0).ceil() as i64;
    match days {
        d if d < 0 => "Expiré".to_string(),
        0 => "Aujourd'hui".to_string(),
        1 => "Demain".to_string(),
        d => format!("Dans {} jours", d),
    }
}

/// Label for how long ago `timestamp` happened
pub fn elapsed_label(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(ts) = parse_timestamp(timestamp) else {
        return String::new();
    };
    let elapsed = now - ts;
    let hours = elapsed.num_hours();
    if hours < 1 {
        format!("Il y a {} min", elapsed.num_minutes().max(0))
    } else if hours < 24 {
        format!("Il y a {}h", hours)
    } else {
        let days = hours / 24;
        format!("Il y a {} jour{}", days, if days > 1 { "s" } else { "" })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn center_name(center: Option<&BtcDto>) -> Option<&str> {
    non_empty(center.and_then(|c| c.name.as_deref()))
}

fn center_wilaya(center: Option<&BtcDto>) -> Option<&str> {
    non_empty(center.and_then(|c| c.wilaya.as_ref()).and_then(|w| w.name.as_deref()))
}

/// A blood request as listed on the dashboard and requests screens
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestView {
    pub id: String,
    pub hospital_name: String,
    pub blood_type: String,
    pub blood_group: Option<i64>,
    pub urgency: Urgency,
    pub deadline: String,
    pub deadline_label: String,
    pub location: String,
    pub wilaya_id: Option<i64>,
    pub notes: String,
    pub units_needed: u32,
    pub contact_phone: String,
    pub contact_email: String,
    pub contact_person: String,
}

impl BloodRequestView {
    pub fn from_dto(dto: &BloodDonationRequestDto, index: usize, now: DateTime<Utc>) -> Self {
        let center = dto.blood_tansfusion_center.as_ref();
        let deadline = dto
            .deadline
            .clone()
            .or_else(|| dto.request_due_date.clone())
            .unwrap_or_default();

        Self {
            id: dto.id.clone().unwrap_or_else(|| format!("request-{}", index)),
            hospital_name: center_name(center).unwrap_or(UNKNOWN_HOSPITAL).to_string(),
            blood_type: view_label(dto.blood_group),
            blood_group: dto.blood_group,
            urgency: Urgency::for_request(dto.priority, &deadline, now),
            deadline_label: deadline_label(&deadline, now),
            deadline,
            location: center_wilaya(center).unwrap_or(UNSPECIFIED_LOCATION).to_string(),
            wilaya_id: center
                .and_then(|c| c.wilaya.as_ref())
                .and_then(|w| w.id)
                .or_else(|| center.and_then(|c| c.wilaya_id)),
            notes: dto
                .notes
                .clone()
                .or_else(|| dto.more_details.clone())
                .unwrap_or_default(),
            units_needed: dto.units_needed.or(dto.requested_qty).unwrap_or(1),
            contact_phone: center.and_then(|c| c.tel.clone()).unwrap_or_default(),
            contact_email: center.and_then(|c| c.email.clone()).unwrap_or_default(),
            contact_person: non_empty(dto.contact_person.as_deref())
                .unwrap_or(DEFAULT_CONTACT_PERSON)
                .to_string(),
        }
    }

    pub fn from_dtos(dtos: &[BloodDonationRequestDto], now: DateTime<Utc>) -> Vec<Self> {
        dtos.iter()
            .enumerate()
            .map(|(index, dto)| Self::from_dto(dto, index, now))
            .collect()
    }
}

/// Badges earned for a number of donations, lowest first
pub fn badges_for(donation_count: u32) -> Vec<String> {
    DONOR_BADGES
        .iter()
        .filter(|(threshold, _)| donation_count >= *threshold)
        .map(|(_, label)| label.to_string())
        .collect()
}

/// A donor as listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorView {
    pub id: String,
    pub name: String,
    pub blood_type: String,
    pub wilaya: String,
    pub last_donation: Option<String>,
    pub total_donations: u32,
    pub is_eligible: bool,
    pub badges: Vec<String>,
    pub avatar: Option<String>,
    pub email: String,
    pub phone: String,
    pub contact_method: Option<i32>,
    pub privacy: PrivacySettings,
}

impl DonorView {
    pub fn from_dto(dto: &UserDto, index: usize) -> Self {
        let count = dto.donor_donation_count.unwrap_or(0);
        let id = dto.id.clone().unwrap_or_else(|| {
            format!(
                "donor-{}{}{}",
                dto.username.as_deref().unwrap_or(""),
                dto.email.as_deref().unwrap_or(""),
                index
            )
        });

        Self {
            id,
            name: dto
                .full_name()
                .or_else(|| non_empty(dto.username.as_deref()).map(str::to_string))
                .unwrap_or_else(|| ANONYMOUS_DONOR.to_string()),
            blood_type: view_label(dto.donor_blood_group),
            wilaya: non_empty(dto.wilaya.as_ref().and_then(|w| w.name.as_deref()))
                .unwrap_or(UNSPECIFIED_LOCATION)
                .to_string(),
            last_donation: dto.donor_last_donation_date.clone(),
            total_donations: count,
            is_eligible: dto.donor_can_donate_now.unwrap_or(false),
            badges: badges_for(count),
            avatar: dto.profile_picture_url.clone(),
            email: dto.email.clone().unwrap_or_default(),
            phone: dto.donor_tel.clone().unwrap_or_default(),
            contact_method: dto.donor_contact_method,
            privacy: PrivacySettings::from_donor_flags(
                dto.excluded_from_public_portal(),
                dto.donor_want_to_stay_anonymous.unwrap_or(false),
            ),
        }
    }

    pub fn from_dtos(dtos: &[UserDto]) -> Vec<Self> {
        dtos.iter()
            .enumerate()
            .map(|(index, dto)| Self::from_dto(dto, index))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HospitalKind {
    Public,
    Private,
    Clinic,
}

impl HospitalKind {
    /// Guess the kind of center from its name
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("chu") || lower.contains("hopital") || lower.contains("hôpital") {
            HospitalKind::Public
        } else if lower.contains("clinique") {
            HospitalKind::Clinic
        } else {
            HospitalKind::Private
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HospitalKind::Public => "Public",
            HospitalKind::Private => "Privé",
            HospitalKind::Clinic => "Clinique",
        }
    }
}

/// A blood transfusion center as listed in the hospital directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalView {
    pub id: String,
    pub name: String,
    pub kind: HospitalKind,
    pub wilaya: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub open_hours: String,
    pub active_requests: usize,
    pub total_requests: usize,
    pub blood_bank_capacity: u32,
    pub specialties: Vec<String>,
    pub subscribed: bool,
}

impl HospitalView {
    pub fn from_dto(dto: &BtcDto) -> Self {
        let name = dto.name.clone().unwrap_or_default();
        let requests = dto.blood_donation_requests.as_deref().unwrap_or_default();

        Self {
            id: dto.id.clone().unwrap_or_default(),
            kind: HospitalKind::from_name(&name),
            name,
            wilaya: dto
                .wilaya
                .as_ref()
                .and_then(|w| w.name.clone())
                .unwrap_or_default(),
            address: dto.address.clone().unwrap_or_default(),
            phone: dto.tel.clone().unwrap_or_default(),
            email: dto.email.clone().unwrap_or_default(),
            open_hours: DEFAULT_OPEN_HOURS.to_string(),
            active_requests: requests
                .iter()
                .filter(|r| r.evolution_status != Some(REQUEST_STATUS_CLOSED))
                .count(),
            total_requests: requests.len(),
            blood_bank_capacity: DEFAULT_BLOOD_BANK_CAPACITY,
            specialties: vec![DEFAULT_SPECIALTY.to_string()],
            subscribed: dto.logged_user_subscribed.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PledgeStatus {
    Active,
    Completed,
    Cancelled,
}

impl PledgeStatus {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(PLEDGE_STATUS_COMPLETED) => PledgeStatus::Completed,
            Some(PLEDGE_STATUS_CANCELLED) => PledgeStatus::Cancelled,
            _ => PledgeStatus::Active,
        }
    }

    /// Server-side `evolutionStatus`; active pledges span several codes
    pub fn code(self) -> Option<i32> {
        match self {
            PledgeStatus::Active => None,
            PledgeStatus::Completed => Some(PLEDGE_STATUS_COMPLETED),
            PledgeStatus::Cancelled => Some(PLEDGE_STATUS_CANCELLED),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PledgeStatus::Active => "Actif",
            PledgeStatus::Completed => "Terminé",
            PledgeStatus::Cancelled => "Annulé",
        }
    }
}

impl FromStr for PledgeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(PledgeStatus::Active),
            "completed" => Ok(PledgeStatus::Completed),
            "cancelled" | "canceled" => Ok(PledgeStatus::Cancelled),
            other => Err(format!("unknown pledge status '{}'", other)),
        }
    }
}

/// A donor's pledge with the request it answers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeView {
    pub id: String,
    pub request_id: String,
    pub hospital_name: String,
    pub blood_type: String,
    pub urgency: Urgency,
    pub pledge_date: String,
    pub location: String,
    pub contact_phone: String,
    pub status: PledgeStatus,
    pub created_at: String,
    pub notes: Option<String>,
}

impl PledgeView {
    pub fn from_dto(dto: &PledgeDto, now: DateTime<Utc>) -> Self {
        let request = dto.blood_donation_request.as_ref();
        let center = request.and_then(|r| r.blood_tansfusion_center.as_ref());
        let deadline = request
            .and_then(|r| r.deadline.clone().or_else(|| r.request_due_date.clone()))
            .unwrap_or_default();

        Self {
            id: dto.id.clone().unwrap_or_default(),
            request_id: dto
                .blood_donation_request_id
                .clone()
                .or_else(|| request.and_then(|r| r.id.clone()))
                .unwrap_or_default(),
            hospital_name: center_name(center).unwrap_or(UNKNOWN_HOSPITAL).to_string(),
            blood_type: view_label(request.and_then(|r| r.blood_group)),
            urgency: Urgency::for_request(request.and_then(|r| r.priority), &deadline, now),
            pledge_date: dto.pledge_date.clone().unwrap_or_default(),
            location: center_wilaya(center).unwrap_or(UNSPECIFIED_LOCATION).to_string(),
            contact_phone: center.and_then(|c| c.tel.clone()).unwrap_or_default(),
            status: PledgeStatus::from_code(dto.evolution_status),
            created_at: dto.created_at.clone().unwrap_or_default(),
            notes: dto.pledge_notes.clone().filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Completed,
    Pending,
    Cancelled,
}

impl DonationStatus {
    /// Missing status means a recorded (completed) donation
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("completed") => DonationStatus::Completed,
            Some("cancelled") | Some("canceled") => DonationStatus::Cancelled,
            Some(_) => DonationStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DonationStatus::Completed => "Terminé",
            DonationStatus::Pending => "En attente",
            DonationStatus::Cancelled => "Annulé",
        }
    }
}

/// One entry of the donation history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub id: String,
    pub date: String,
    pub hospital_name: String,
    pub blood_type: String,
    pub amount: u32,
    pub donation_type: Option<String>,
    pub status: DonationStatus,
    pub certificate_url: Option<String>,
}

impl DonationView {
    /// `donor_blood_type` fills in when the entry carries no group
    pub fn from_dto(dto: &DonationDto, donor_blood_type: Option<&str>) -> Self {
        let blood_type = match (dto.blood_type.as_deref(), dto.blood_group) {
            (Some(raw), _) if !raw.is_empty() => display_blood_type(raw),
            (_, Some(code)) => view_label(Some(code)),
            _ => donor_blood_type
                .unwrap_or(UNKNOWN_BLOOD_TYPE_SHORT)
                .to_string(),
        };

        Self {
            id: dto.id.clone().unwrap_or_default(),
            date: dto.date.clone().unwrap_or_default(),
            hospital_name: non_empty(dto.hospital_name.as_deref())
                .or_else(|| center_name(dto.blood_tansfusion_center.as_ref()))
                .unwrap_or(UNKNOWN_HOSPITAL)
                .to_string(),
            blood_type,
            amount: dto.amount.unwrap_or(STANDARD_DONATION_VOLUME_ML),
            donation_type: dto
                .donation_type
                .and_then(DonationType::from_code)
                .map(|t| t.label().to_string()),
            status: DonationStatus::parse(dto.status.as_deref()),
            certificate_url: dto.certificate_url.clone(),
        }
    }
}

/// Aggregate shown above the donation history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total_donations: u32,
    pub total_volume: u32,
    pub last_donation: Option<String>,
}

impl DonationSummary {
    /// Only completed donations count towards the totals
    pub fn from_views(donations: &[DonationView]) -> Self {
        let completed: Vec<&DonationView> = donations
            .iter()
            .filter(|d| d.status == DonationStatus::Completed)
            .collect();

        let last_donation = donations
            .iter()
            .filter_map(|d| parse_timestamp(&d.date).map(|ts| (ts, &d.date)))
            .max_by_key(|(ts, _)| *ts)
            .map(|(_, date)| date.clone());

        Self {
            total_donations: completed.len() as u32,
            total_volume: completed.iter().map(|d| d.amount).sum(),
            last_donation,
        }
    }
}

impl From<DonationStats> for DonationSummary {
    fn from(stats: DonationStats) -> Self {
        Self {
            total_donations: stats.total_donations,
            total_volume: stats.total_volume,
            last_donation: stats.last_donation.filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Urgent,
    Info,
    Success,
}

impl NotificationKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("urgent") => NotificationKind::Urgent,
            Some("success") => NotificationKind::Success,
            _ => NotificationKind::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub hospital_id: Option<String>,
    pub hospital_name: Option<String>,
    pub timestamp: String,
    pub is_read: bool,
}

impl NotificationView {
    pub fn from_dto(dto: &NotificationDto) -> Self {
        Self {
            id: dto.id.clone().unwrap_or_default(),
            title: dto.title.clone().unwrap_or_default(),
            message: dto.message.clone().unwrap_or_default(),
            kind: NotificationKind::parse(dto.kind.as_deref()),
            hospital_id: dto.hospital_id.clone(),
            hospital_name: dto.hospital_name.clone(),
            timestamp: dto.timestamp.clone().unwrap_or_default(),
            is_read: dto.is_read.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RequestSummaryDto, WilayaDto};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn iso(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339()
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        assert!(parse_timestamp("2026-03-10T12:00:00Z").is_some());
        assert!(parse_timestamp("2026-03-10T12:00:00.123").is_some());
        assert_eq!(
            parse_timestamp("2026-03-10"),
            Some(Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_urgency_from_deadline() {
        let now = now();
        assert_eq!(Urgency::from_deadline(&iso(now + Duration::hours(5)), now), Urgency::Critical);
        assert_eq!(Urgency::from_deadline(&iso(now + Duration::hours(24)), now), Urgency::Critical);
        assert_eq!(Urgency::from_deadline(&iso(now + Duration::hours(48)), now), Urgency::Urgent);
        assert_eq!(Urgency::from_deadline(&iso(now + Duration::days(5)), now), Urgency::Standard);
        assert_eq!(Urgency::from_deadline(&iso(now - Duration::days(1)), now), Urgency::Critical);
        assert_eq!(Urgency::from_deadline("", now), Urgency::Standard);
    }

    #[test]
    fn test_priority_overrides_deadline() {
        let now = now();
        let far = iso(now + Duration::days(30));
        assert_eq!(Urgency::for_request(Some(3), &far, now), Urgency::Critical);
        assert_eq!(Urgency::for_request(Some(2), &far, now), Urgency::Urgent);
        assert_eq!(Urgency::for_request(Some(1), "", now), Urgency::Standard);
        assert_eq!(
            Urgency::for_request(Some(99), &iso(now + Duration::hours(2)), now),
            Urgency::Critical
        );
    }

    #[test]
    fn test_deadline_labels() {
        let now = now();
        assert_eq!(deadline_label(&iso(now - Duration::days(2)), now), "Expiré");
        assert_eq!(deadline_label(&iso(now), now), "Aujourd'hui");
        assert_eq!(deadline_label(&iso(now + Duration::hours(3)), now), "Demain");
        assert_eq!(deadline_label(&iso(now + Duration::hours(60)), now), "Dans 3 jours");
        assert_eq!(deadline_label("not a date", now), "Date invalide");
    }

    #[test]
    fn test_elapsed_labels() {
        let now = now();
        assert_eq!(elapsed_label(&iso(now - Duration::minutes(5)), now), "Il y a 5 min");
        assert_eq!(elapsed_label(&iso(now - Duration::hours(6)), now), "Il y a 6h");
        assert_eq!(elapsed_label(&iso(now - Duration::hours(25)), now), "Il y a 1 jour");
        assert_eq!(elapsed_label(&iso(now - Duration::days(3)), now), "Il y a 3 jours");
    }

    #[test]
    fn test_request_view_defaults() {
        let view = BloodRequestView::from_dto(&BloodDonationRequestDto::default(), 4, now());
        assert_eq!(view.id, "request-4");
        assert_eq!(view.hospital_name, "Hôpital inconnu");
        assert_eq!(view.location, "Non spécifiée");
        assert_eq!(view.contact_person, "Responsable");
        assert_eq!(view.blood_type, "?");
        assert_eq!(view.units_needed, 1);
        assert_eq!(view.urgency, Urgency::Standard);
        assert_eq!(view.deadline_label, "Date invalide");
    }

    #[test]
    fn test_request_view_from_full_dto() {
        let dto = BloodDonationRequestDto {
            id: Some("r1".to_string()),
            blood_group: Some(8),
            requested_qty: Some(3),
            priority: Some(3),
            more_details: Some("bloc opératoire".to_string()),
            blood_tansfusion_center: Some(BtcDto {
                name: Some("CHU Mustapha".to_string()),
                tel: Some("021".to_string()),
                wilaya: Some(WilayaDto {
                    id: Some(16),
                    name: Some("Alger".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let view = BloodRequestView::from_dto(&dto, 0, now());
        assert_eq!(view.id, "r1");
        assert_eq!(view.blood_type, "O-");
        assert_eq!(view.units_needed, 3);
        assert_eq!(view.urgency, Urgency::Critical);
        assert_eq!(view.location, "Alger");
        assert_eq!(view.wilaya_id, Some(16));
        assert_eq!(view.notes, "bloc opératoire");
        assert_eq!(view.contact_phone, "021");
    }

    #[test]
    fn test_badges_thresholds() {
        assert!(badges_for(0).is_empty());
        assert_eq!(badges_for(1), vec!["Donneur"]);
        assert_eq!(badges_for(12), vec!["Donneur", "Généreux", "Héros"]);
        assert_eq!(badges_for(25).len(), 4);
    }

    #[test]
    fn test_donor_view_names() {
        let named = UserDto {
            first_name: Some("Amina".to_string()),
            last_name: Some("Benali".to_string()),
            donor_donation_count: Some(5),
            donor_excluded_from_public_portal: Some(true),
            ..Default::default()
        };
        let view = DonorView::from_dto(&named, 0);
        assert_eq!(view.name, "Amina Benali");
        assert_eq!(view.badges, vec!["Donneur", "Généreux"]);
        assert!(!view.privacy.show_on_public_list);
        assert_eq!(view.wilaya, "Non spécifiée");

        let username = UserDto {
            username: Some("karim".to_string()),
            email: Some("k@x.dz".to_string()),
            ..Default::default()
        };
        let view = DonorView::from_dto(&username, 2);
        assert_eq!(view.name, "karim");
        assert_eq!(view.id, "donor-karimk@x.dz2");

        assert_eq!(DonorView::from_dto(&UserDto::default(), 0).name, "Donneur anonyme");
    }

    #[test]
    fn test_hospital_view() {
        assert_eq!(HospitalKind::from_name("CHU Oran"), HospitalKind::Public);
        assert_eq!(HospitalKind::from_name("Hôpital Parnet"), HospitalKind::Public);
        assert_eq!(HospitalKind::from_name("Clinique El Azhar"), HospitalKind::Clinic);
        assert_eq!(HospitalKind::from_name("Centre Pasteur"), HospitalKind::Private);

        let dto = BtcDto {
            id: Some("b1".to_string()),
            name: Some("CHU Oran".to_string()),
            blood_donation_requests: Some(vec![
                RequestSummaryDto {
                    evolution_status: Some(1),
                    ..Default::default()
                },
                RequestSummaryDto {
                    evolution_status: Some(3),
                    ..Default::default()
                },
                RequestSummaryDto::default(),
            ]),
            logged_user_subscribed: Some(true),
            ..Default::default()
        };
        let view = HospitalView::from_dto(&dto);
        assert_eq!(view.active_requests, 2);
        assert_eq!(view.total_requests, 3);
        assert_eq!(view.open_hours, "24h/24, 7j/7");
        assert_eq!(view.blood_bank_capacity, 500);
        assert!(view.subscribed);
    }

    #[test]
    fn test_pledge_status_codes() {
        assert_eq!(PledgeStatus::from_code(Some(3)), PledgeStatus::Completed);
        assert_eq!(PledgeStatus::from_code(Some(4)), PledgeStatus::Cancelled);
        assert_eq!(PledgeStatus::from_code(Some(1)), PledgeStatus::Active);
        assert_eq!(PledgeStatus::Completed.code(), Some(3));
        assert_eq!(PledgeStatus::Cancelled.code(), Some(4));
        assert_eq!(PledgeStatus::Active.code(), None);
        assert_eq!(PledgeStatus::from_code(None), PledgeStatus::Active);

        let dto = PledgeDto {
            id: Some("p1".to_string()),
            evolution_status: Some(3),
            blood_donation_request: Some(BloodDonationRequestDto {
                id: Some("r9".to_string()),
                blood_group: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let view = PledgeView::from_dto(&dto, now());
        assert_eq!(view.request_id, "r9");
        assert_eq!(view.blood_type, "A+");
        assert_eq!(view.status, PledgeStatus::Completed);
        assert_eq!(view.hospital_name, "Hôpital inconnu");
    }

    #[test]
    fn test_donation_summary_counts_completed_only() {
        let donations = vec![
            DonationView::from_dto(
                &DonationDto {
                    date: Some("2025-01-15T10:00:00Z".to_string()),
                    amount: Some(450),
                    ..Default::default()
                },
                Some("O+"),
            ),
            DonationView::from_dto(
                &DonationDto {
                    date: Some("2025-06-01T10:00:00Z".to_string()),
                    amount: Some(300),
                    status: Some("pending".to_string()),
                    ..Default::default()
                },
                None,
            ),
            DonationView::from_dto(
                &DonationDto {
                    date: Some("2024-10-20T10:00:00Z".to_string()),
                    blood_type: Some("7".to_string()),
                    ..Default::default()
                },
                None,
            ),
        ];
        assert_eq!(donations[0].blood_type, "O+");
        assert_eq!(donations[1].blood_type, "?");
        assert_eq!(donations[2].blood_type, "O+");
        assert_eq!(donations[2].amount, STANDARD_DONATION_VOLUME_ML);

        let summary = DonationSummary::from_views(&donations);
        assert_eq!(summary.total_donations, 2);
        assert_eq!(summary.total_volume, 450 + STANDARD_DONATION_VOLUME_ML);
        assert_eq!(summary.last_donation.as_deref(), Some("2025-06-01T10:00:00Z"));
    }

    #[test]
    fn test_notification_kind() {
        assert_eq!(NotificationKind::parse(Some("urgent")), NotificationKind::Urgent);
        assert_eq!(NotificationKind::parse(Some("SUCCESS")), NotificationKind::Success);
        assert_eq!(NotificationKind::parse(None), NotificationKind::Info);
        let view = NotificationView::from_dto(&NotificationDto {
            id: Some("n1".to_string()),
            is_read: Some(true),
            ..Default::default()
        });
        assert!(view.is_read);
        assert_eq!(view.kind, NotificationKind::Info);
    }
}
