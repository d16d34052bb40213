use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use super::OutputFormat;
use crate::api::{CommuneDto, NotificationSettings, WilayaDto};
use crate::domain::{
    elapsed_label, BloodRequestView, ContactMethod, DonationSummary, DonationView, DonorView,
    Fetched, HospitalView, NotificationView, PledgeStatus, PledgeView, SessionRecord, Urgency,
};

/// Print `value` as pretty JSON, or through `text` otherwise
pub fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text(value)),
    }
    Ok(())
}

/// Warn on stderr when defaults stand in for server data
pub fn warn_fallback<T>(fetched: &Fetched<T>, what: &str) {
    if let Some(cause) = fetched.cause() {
        eprintln!(
            "{} {} indisponible, valeurs par défaut affichées ({})",
            "Attention:".yellow().bold(),
            what,
            cause
        );
    }
}

/// Confirmation for actions without a payload
pub fn done(format: OutputFormat, message: &str) -> Result<()> {
    emit(format, &serde_json::json!({ "message": message }), |_| {
        format!("{} {}", "✓".green().bold(), message)
    })
}

fn empty_or(lines: Vec<String>, empty: &str) -> String {
    if lines.is_empty() {
        empty.dimmed().to_string()
    } else {
        lines.join("\n")
    }
}

fn urgency_badge(urgency: Urgency) -> String {
    let label = format!("[{}]", urgency.label());
    match urgency {
        Urgency::Critical => label.red().bold().to_string(),
        Urgency::Urgent => label.yellow().to_string(),
        Urgency::Standard => label.green().to_string(),
    }
}

/// Session record without the bearer token
pub fn public_record(record: &SessionRecord) -> SessionRecord {
    let mut record = record.clone();
    record.token = None;
    record
}

pub fn session_summary(record: &SessionRecord) -> String {
    format!(
        "{} <{}>\n  Groupe sanguin: {}\n  Wilaya: {}",
        record.name.bold(),
        record.email,
        record.blood_type.as_deref().unwrap_or("-"),
        record.wilaya.as_deref().unwrap_or("-"),
    )
}

pub fn profile_details(record: &SessionRecord) -> String {
    let yes_no = |flag: bool| if flag { "oui" } else { "non" };
    let contact = record
        .donor_contact_method
        .and_then(|code| ContactMethod::from_code(code as i64))
        .map_or("-", |method| method.label());
    let prefs = &record.notification_preferences;

    let mut lines = vec![session_summary(record)];
    lines.push(format!("  Téléphone: {}", record.donor_tel.as_deref().unwrap_or("-")));
    lines.push(format!("  Contact préféré: {}", contact));
    lines.push(format!(
        "  Dernier don: {}",
        record.donor_last_donation_date.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "  Visible publiquement: {}  Anonyme: {}",
        yes_no(record.privacy_settings.show_on_public_list),
        yes_no(record.privacy_settings.is_anonymous)
    ));
    lines.push(format!(
        "  Notifications: {} (e-mail {}, SMS {})",
        yes_no(prefs.enable_notifications),
        yes_no(prefs.email_notifications),
        yes_no(prefs.sms_notifications)
    ));
    if !prefs.subscribed_hospitals.is_empty() {
        lines.push(format!("  Centres suivis: {}", prefs.subscribed_hospitals.join(", ")));
    }
    lines.join("\n")
}

pub fn request_lines(requests: &[BloodRequestView]) -> String {
    let lines = requests
        .iter()
        .map(|r| {
            format!(
                "{} {} {} - {} ({}) - {} unité(s), {}  [{}]",
                urgency_badge(r.urgency),
                r.blood_type.bold(),
                r.hospital_name,
                r.location,
                r.deadline_label,
                r.units_needed,
                r.contact_person,
                r.id.dimmed()
            )
        })
        .collect();
    empty_or(lines, "Aucune demande trouvée")
}

pub fn donor_lines(donors: &[DonorView]) -> String {
    let lines = donors
        .iter()
        .map(|d| {
            let badges = if d.badges.is_empty() {
                String::new()
            } else {
                format!(" [{}]", d.badges.join(", "))
            };
            format!(
                "{} {} - {} - {} don(s){}",
                d.blood_type.bold(),
                d.name,
                d.wilaya,
                d.total_donations,
                badges
            )
        })
        .collect();
    empty_or(lines, "Aucun donneur trouvé")
}

pub fn hospital_lines(hospitals: &[HospitalView]) -> String {
    let lines = hospitals
        .iter()
        .map(|h| {
            let followed = if h.subscribed { " ★".yellow().to_string() } else { String::new() };
            format!(
                "{}{} ({}) - {} - {} demande(s) active(s)  [{}]",
                h.name.bold(),
                followed,
                h.kind.label(),
                h.wilaya,
                h.active_requests,
                h.id.dimmed()
            )
        })
        .collect();
    empty_or(lines, "Aucun centre trouvé")
}

pub fn pledge_lines(pledges: &[PledgeView]) -> String {
    let lines = pledges
        .iter()
        .map(|p| {
            let status = match p.status {
                PledgeStatus::Active => p.status.label().cyan().to_string(),
                PledgeStatus::Completed => p.status.label().green().to_string(),
                PledgeStatus::Cancelled => p.status.label().dimmed().to_string(),
            };
            format!(
                "{} {} {} - {} le {}  [{}]",
                status,
                p.blood_type.bold(),
                p.hospital_name,
                p.location,
                p.pledge_date,
                p.id.dimmed()
            )
        })
        .collect();
    empty_or(lines, "Aucune promesse de don")
}

pub fn donation_summary(summary: &DonationSummary) -> String {
    format!(
        "{} don(s), {} ml au total, dernier don: {}",
        summary.total_donations.to_string().bold(),
        summary.total_volume,
        summary.last_donation.as_deref().unwrap_or("-")
    )
}

pub fn donation_lines(donations: &[DonationView]) -> String {
    let lines = donations
        .iter()
        .map(|d| {
            format!(
                "{} {} - {} - {} ml ({})  [{}]",
                d.date,
                d.blood_type.bold(),
                d.hospital_name,
                d.amount,
                d.status.label(),
                d.id.dimmed()
            )
        })
        .collect();
    empty_or(lines, "Aucun don enregistré")
}

pub fn notification_lines(notifications: &[NotificationView], now: DateTime<Utc>) -> String {
    let lines = notifications
        .iter()
        .map(|n| {
            let marker = if n.is_read { " ".normal() } else { "●".blue() };
            format!(
                "{} {} - {} ({})  [{}]",
                marker,
                n.title.bold(),
                n.message,
                elapsed_label(&n.timestamp, now),
                n.id.dimmed()
            )
        })
        .collect();
    empty_or(lines, "Aucune notification")
}

pub fn notification_settings(settings: &NotificationSettings) -> String {
    let on_off = |flag: bool| if flag { "activé" } else { "désactivé" };
    let levels = &settings.urgency_levels;
    let methods = &settings.notification_methods;
    let followed = if settings.subscribed_hospitals.is_empty() {
        "-".to_string()
    } else {
        settings.subscribed_hospitals.join(", ")
    };
    [
        format!("Notifications: {}", on_off(settings.enable_notifications)),
        format!(
            "Urgence haute: {}, moyenne: {}, basse: {}",
            on_off(levels.high),
            on_off(levels.medium),
            on_off(levels.low)
        ),
        format!(
            "Push: {}, e-mail: {}, SMS: {}",
            on_off(methods.push),
            on_off(methods.email),
            on_off(methods.sms)
        ),
        format!("Centres suivis: {}", followed),
    ]
    .join("\n")
}

pub fn wilaya_lines(wilayas: &[WilayaDto]) -> String {
    let lines = wilayas
        .iter()
        .map(|w| {
            format!(
                "{:>3}  {}",
                w.id.map(|id| id.to_string()).unwrap_or_default(),
                w.name.as_deref().unwrap_or("-")
            )
        })
        .collect();
    empty_or(lines, "Aucune wilaya")
}

pub fn commune_lines(communes: &[CommuneDto]) -> String {
    let lines = communes
        .iter()
        .map(|c| {
            format!(
                "{:>5}  {}",
                c.id.map(|id| id.to_string()).unwrap_or_default(),
                c.name.as_deref().unwrap_or("-")
            )
        })
        .collect();
    empty_or(lines, "Aucune commune")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BloodDonationRequestDto;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_public_record_drops_token() {
        let record = SessionRecord::new("u1", "Amina", "a@b.dz").with_token("secret");
        let json = serde_json::to_string(&public_record(&record)).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_request_lines() {
        plain();
        let now = Utc::now();
        let views = BloodRequestView::from_dtos(
            &[BloodDonationRequestDto {
                id: Some("r1".to_string()),
                blood_group: Some(7),
                priority: Some(3),
                ..Default::default()
            }],
            now,
        );
        let text = request_lines(&views);
        assert!(text.contains("[Critique]"));
        assert!(text.contains("O+"));
        assert!(text.contains("Hôpital inconnu"));
        assert!(text.contains("[r1]"));

        assert_eq!(request_lines(&[]), "Aucune demande trouvée");
    }

    #[test]
    fn test_profile_details_labels_contact_method() {
        plain();
        let mut record = SessionRecord::new("u1", "Amina", "a@b.dz");
        record.donor_contact_method = Some(2);
        record.notification_preferences.subscribed_hospitals = vec!["btc-1".to_string()];
        let text = profile_details(&record);
        assert!(text.contains("Contact préféré: Message texte"));
        assert!(text.contains("Centres suivis: btc-1"));
    }

    #[test]
    fn test_notification_settings_text() {
        plain();
        let text = notification_settings(&NotificationSettings::default());
        assert!(text.contains("Notifications: activé"));
        assert!(text.contains("basse: désactivé"));
        assert!(text.contains("Centres suivis: -"));
    }
}
