use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use super::args::{
    Cli, Commands, DonorArgs, HospitalArgs, NotificationCommand, NotificationSettingsArgs,
    PledgeCommand, ProfileCommand, ProfileUpdateArgs, RequestArgs, RequestCreateArgs,
    RequestSource,
};
use super::render::{self, done, emit, warn_fallback};
use super::OutputFormat;
use crate::api::{
    ApiClient, DonorProfilePatch, NewBloodRequest, NewPledge, NotificationSettings, PledgeFilter,
    RegisterData,
};
use crate::app::{get_data_dir, init_config, AppState};
use crate::constants::DEFAULT_NEARBY_RADIUS_KM;
use crate::domain::{
    BloodRequestView, DonationSummary, DonationView, DonorFilter, DonorView, HospitalFilter,
    HospitalView, NotificationView, PledgeStatus, PledgeView, ProfileUpdate, RequestFilter,
    SessionRecord,
};
use crate::session::SessionStatus;
use crate::utils::SessionError;

/// Write a default configuration file
pub fn init(path: Option<PathBuf>) -> Result<()> {
    println!("Initializing DonorConnect configuration...");
    match init_config(path)? {
        Some(created) => println!("Configuration written to {}", created.display()),
        None => println!("Configuration already exists, left untouched"),
    }
    Ok(())
}

/// Dispatch a subcommand against a bootstrapped session
pub async fn handle_command(cli: &Cli, state: &AppState) -> Result<()> {
    let format = cli.output;
    match &cli.command {
        Commands::Init => init(cli.config.clone()),
        Commands::Status => show_status(state, format).await,
        Commands::Login { email, password } => {
            let record = state.session.login(email, password).await?;
            emit(format, &render::public_record(&record), |r| {
                format!("{} Connecté en tant que {}", "✓".green().bold(), r.name.bold())
            })
        }
        Commands::Register(args) => {
            let data = RegisterData {
                name: args.name.clone(),
                email: args.email.clone(),
                password: args.password.clone(),
                blood_type: args.blood_type.label().to_string(),
                wilaya: args.wilaya.clone(),
                last_donation: args.last_donation.clone(),
            };
            let record = state.session.register(&data).await?;
            emit(format, &render::public_record(&record), |r| {
                format!("{} Compte créé, connecté en tant que {}", "✓".green().bold(), r.name.bold())
            })
        }
        Commands::Logout => {
            state.session.logout().await;
            done(format, "Déconnecté")
        }
        Commands::Whoami => {
            let record = current_record(state).await?;
            emit(format, &render::public_record(&record), render::session_summary)
        }
        Commands::Profile(ProfileCommand::Show) => {
            let record = current_record(state).await?;
            emit(format, &render::public_record(&record), render::profile_details)
        }
        Commands::Profile(ProfileCommand::Update(args)) => update_profile(args, state, format).await,
        Commands::Requests(args) => list_requests(args, state, format).await,
        Commands::RequestCreate(args) => create_request(args, state, format).await,
        Commands::Donors(args) => list_donors(args, state, format).await,
        Commands::Hospitals(args) => list_hospitals(args, state, format).await,
        Commands::Subscribe { center_id } => {
            let token = state.session.require_token().await?;
            state.api().subscribe_to_center(&token, center_id).await?;
            follow_locally(state, center_id, true).await?;
            done(format, &format!("Abonné au centre {}", center_id))
        }
        Commands::Unsubscribe { center_id } => {
            let token = state.session.require_token().await?;
            state.api().unsubscribe_from_center(&token, center_id).await?;
            follow_locally(state, center_id, false).await?;
            done(format, &format!("Désabonné du centre {}", center_id))
        }
        Commands::Pledge(command) => handle_pledge(command, state, format).await,
        Commands::Donations { stats } => show_donations(*stats, state, format).await,
        Commands::Certificate { donation_id } => {
            let token = state.session.require_token().await?;
            let certificate = state
                .api()
                .donation_certificate(&token, donation_id)
                .await?
                .context("Aucun certificat disponible pour ce don")?;
            emit(format, &certificate, certificate_text)
        }
        Commands::Notifications(command) => handle_notifications(command, state, format).await,
        Commands::Wilayas => {
            let wilayas = state.api().wilayas().await?;
            emit(format, &wilayas, |w| render::wilaya_lines(w))
        }
        Commands::Communes { wilaya } => {
            let mut communes = state.api().communes().await?;
            if let Some(wilaya_id) = wilaya {
                communes.retain(|c| c.wilaya_id == Some(*wilaya_id));
            }
            emit(format, &communes, |c| render::commune_lines(c))
        }
    }
}

async fn current_record(state: &AppState) -> Result<SessionRecord> {
    Ok(state
        .session
        .current()
        .await
        .ok_or(SessionError::NotAuthenticated)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    unread_notifications: Option<usize>,
    active_pledges: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    status: SessionStatus,
    user: Option<SessionRecord>,
    base_url: String,
    data_dir: Option<PathBuf>,
    dashboard: Option<Dashboard>,
}

/// Unread notifications and active pledges, fetched side by side
async fn dashboard(state: &AppState, token: &str) -> Dashboard {
    let api = state.api();
    let filter = PledgeFilter::default();
    let (notifications, pledges) = futures::join!(
        api.notifications(token),
        api.list_pledges(token, &filter)
    );

    Dashboard {
        unread_notifications: notifications.is_live().then(|| {
            notifications
                .value()
                .iter()
                .filter(|n| !n.is_read.unwrap_or(false))
                .count()
        }),
        active_pledges: pledges.ok().map(|pledges| {
            pledges
                .iter()
                .filter(|p| PledgeStatus::from_code(p.evolution_status) == PledgeStatus::Active)
                .count()
        }),
    }
}

async fn show_status(state: &AppState, format: OutputFormat) -> Result<()> {
    let data_dir = get_data_dir(&*state.config.read().await).ok();
    let dashboard = match state.session.token().await {
        Some(token) => Some(dashboard(state, &token).await),
        None => None,
    };
    let report = StatusReport {
        status: state.session.status().await,
        user: state.session.current().await.map(|r| render::public_record(&r)),
        base_url: state.api().base_url().to_string(),
        data_dir,
        dashboard,
    };

    emit(format, &report, |r| {
        let mut lines = vec!["DonorConnect Status:".bold().to_string()];
        match &r.user {
            Some(user) => lines.push(format!("  [OK] Session: {} ({})", user.name, user.email)),
            None => lines.push(format!("  [--] Session: {}", r.status)),
        }
        lines.push(format!("  Server: {}", r.base_url));
        if let Some(dir) = &r.data_dir {
            lines.push(format!("  Data: {}", dir.display()));
        }
        if let Some(dashboard) = &r.dashboard {
            let count = |n: Option<usize>| n.map_or("?".to_string(), |n| n.to_string());
            lines.push(format!(
                "  Notifications non lues: {}  Promesses actives: {}",
                count(dashboard.unread_notifications),
                count(dashboard.active_pledges)
            ));
        }
        lines.join("\n")
    })
}

fn profile_patch(args: &ProfileUpdateArgs) -> DonorProfilePatch {
    DonorProfilePatch {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        donor_tel: args.phone.clone(),
        donor_blood_group: args.blood_type.map(|g| g.code() as i64),
        donor_contact_method: args.contact_method,
        donor_want_to_stay_anonymous: args.anonymous,
        donor_excluded_from_public_portal: args.hide_from_public,
        wilaya_id: args.wilaya_id,
    }
}

async fn update_profile(args: &ProfileUpdateArgs, state: &AppState, format: OutputFormat) -> Result<()> {
    let patch = profile_patch(args);
    if patch == DonorProfilePatch::default() {
        bail!("Aucune modification demandée");
    }
    let record = state.session.save_profile(patch).await?;
    emit(format, &render::public_record(&record), |r| {
        format!("{} Profil mis à jour\n{}", "✓".green().bold(), render::profile_details(r))
    })
}

/// Mirror a center subscription into the session's notification preferences
async fn follow_locally(state: &AppState, center_id: &str, follow: bool) -> Result<()> {
    let record = current_record(state).await?;
    let mut preferences = record.notification_preferences;
    let followed = &mut preferences.subscribed_hospitals;
    let present = followed.iter().any(|h| h == center_id);
    match (follow, present) {
        (true, false) => followed.push(center_id.to_string()),
        (false, true) => followed.retain(|h| h != center_id),
        _ => return Ok(()),
    }

    state
        .session
        .update_profile(ProfileUpdate {
            notification_preferences: Some(preferences),
            ..Default::default()
        })
        .await?;
    Ok(())
}

async fn list_requests(args: &RequestArgs, state: &AppState, format: OutputFormat) -> Result<()> {
    let api = state.api();
    let token = state.session.token().await;

    let dtos = if let Some(center) = &args.center {
        api.requests_by_center(center, token.as_deref()).await?
    } else {
        match args.source {
            RequestSource::All => {
                let fetched = match token.as_deref() {
                    Some(token) => api.authenticated_requests(token).await,
                    None => api.public_requests().await,
                };
                warn_fallback(&fetched, "La liste des demandes");
                fetched.into_value()
            }
            RequestSource::Subscribed => {
                api.subscribed_requests(&state.session.require_token().await?)
                    .await?
            }
            RequestSource::Matching => {
                api.matching_requests(&state.session.require_token().await?)
                    .await?
            }
            RequestSource::Nearby => {
                let radius = args.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
                api.nearby_requests(&state.session.require_token().await?, radius)
                    .await?
            }
        }
    };
    debug!("Received {} requests", dtos.len());

    let compatible_with = if args.compatible {
        let group = state.session.current().await.and_then(|r| r.blood_group());
        Some(group.context("Groupe sanguin inconnu: connectez-vous et complétez votre profil")?)
    } else {
        None
    };
    let filter = RequestFilter {
        search: args.search.clone(),
        urgency: args.urgency,
        blood_type: args.blood_type.map(|g| g.label().to_string()),
        wilaya: args.wilaya.clone(),
        compatible_with,
    };

    let views = filter.apply(BloodRequestView::from_dtos(&dtos, Utc::now()));
    emit(format, &views, |v| render::request_lines(v))
}

async fn create_request(args: &RequestCreateArgs, state: &AppState, format: OutputFormat) -> Result<()> {
    let token = state.session.require_token().await?;
    let request = NewBloodRequest {
        blood_group: args.blood_type.code() as i64,
        priority: args.priority,
        request_due_date: args.due_date.clone(),
        requested_qty: args.quantity,
        more_details: args.details.clone(),
    };
    state.api().create_request(&token, &request).await?;
    done(
        format,
        &format!("Demande publiée pour le groupe {}", args.blood_type),
    )
}

async fn list_donors(args: &DonorArgs, state: &AppState, format: OutputFormat) -> Result<()> {
    let api = state.api();
    let token = state.session.token().await;

    let dtos = match (&args.search, args.blood_type, token.as_deref()) {
        (Some(term), _, token) => api.search_donors(term, token).await?,
        (None, Some(group), token) => api.donors_by_blood_group(group, token).await?,
        (None, None, Some(token)) => api.all_donors(token).await?,
        (None, None, None) => api.public_donors().await?,
    };

    let filter = DonorFilter {
        search: None,
        blood_type: args.blood_type.map(|g| g.label().to_string()),
        wilaya: args.wilaya.clone(),
    };
    let views = filter.apply(DonorView::from_dtos(&dtos));
    emit(format, &views, |v| render::donor_lines(v))
}

async fn list_hospitals(args: &HospitalArgs, state: &AppState, format: OutputFormat) -> Result<()> {
    let api = state.api();
    let dtos = if args.subscribed {
        api.subscribed_centers(&state.session.require_token().await?)
            .await?
    } else {
        let fetched = api.centers(state.session.token().await.as_deref()).await;
        warn_fallback(&fetched, "La liste des centres");
        fetched.into_value()
    };

    let filter = HospitalFilter {
        search: args.search.clone(),
        wilaya: args.wilaya.clone(),
    };
    let views = filter.apply(dtos.iter().map(HospitalView::from_dto).collect());
    emit(format, &views, |v| render::hospital_lines(v))
}

async fn handle_pledge(command: &PledgeCommand, state: &AppState, format: OutputFormat) -> Result<()> {
    let token = state.session.require_token().await?;
    let api = state.api();

    match command {
        PledgeCommand::Create {
            request_id,
            date,
            notes,
        } => {
            let pledge = NewPledge {
                blood_donation_request_id: request_id.clone(),
                pledge_date: date.clone(),
                pledge_notes: notes.clone(),
            };
            api.create_pledge(&token, &pledge).await?;
            done(format, "Promesse de don enregistrée")
        }
        PledgeCommand::List { status, take, skip } => {
            // Active has no single server code, so it is filtered per page
            let filter = PledgeFilter {
                evolution_status: status.and_then(PledgeStatus::code),
                pagination_take: *take,
                pagination_skip: *skip,
            };
            let now = Utc::now();
            let views: Vec<PledgeView> = api
                .list_pledges(&token, &filter)
                .await?
                .iter()
                .map(|dto| PledgeView::from_dto(dto, now))
                .filter(|view| status.map_or(true, |s| view.status == s))
                .collect();
            emit(format, &views, |v| render::pledge_lines(v))
        }
        PledgeCommand::Cancel { pledge_id } => {
            api.cancel_pledge(&token, pledge_id).await?;
            done(format, "Promesse de don annulée")
        }
        PledgeCommand::Complete { pledge_id } => {
            api.complete_pledge(&token, pledge_id).await?;
            done(format, "Promesse de don marquée comme terminée")
        }
    }
}

#[derive(Serialize)]
struct DonationReport {
    summary: DonationSummary,
    donations: Vec<DonationView>,
}

async fn show_donations(stats_only: bool, state: &AppState, format: OutputFormat) -> Result<()> {
    let token = state.session.require_token().await?;

    if stats_only {
        let fetched = state.api().donation_stats(&token).await;
        warn_fallback(&fetched, "Les statistiques de dons");
        let summary = DonationSummary::from(fetched.into_value());
        return emit(format, &summary, render::donation_summary);
    }

    let fetched = state.api().donations(&token).await;
    warn_fallback(&fetched, "L'historique des dons");
    let blood_type = state.session.current().await.and_then(|r| r.blood_type);
    let donations: Vec<DonationView> = fetched
        .value()
        .iter()
        .map(|dto| DonationView::from_dto(dto, blood_type.as_deref()))
        .collect();
    let report = DonationReport {
        summary: DonationSummary::from_views(&donations),
        donations,
    };

    emit(format, &report, |r| {
        format!(
            "{}\n{}",
            render::donation_summary(&r.summary),
            render::donation_lines(&r.donations)
        )
    })
}

fn certificate_text(certificate: &Value) -> String {
    ["certificateUrl", "url"]
        .iter()
        .find_map(|key| certificate.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| certificate.to_string())
}

/// Apply the flags to the server's current settings and send them back.
/// Nothing is written when only defaults could be read.
async fn update_settings(
    api: &ApiClient,
    token: &str,
    args: &NotificationSettingsArgs,
) -> Result<NotificationSettings> {
    let fetched = api.notification_settings(token).await;
    if let Some(cause) = fetched.cause() {
        bail!(
            "préférences de notification indisponibles, aucune modification envoyée ({})",
            cause
        );
    }
    let mut settings = fetched.into_value();
    apply_settings(&mut settings, args);
    api.update_notification_settings(token, &settings).await?;
    Ok(settings)
}

fn apply_settings(settings: &mut NotificationSettings, args: &NotificationSettingsArgs) {
    if let Some(enable) = args.enable {
        settings.enable_notifications = enable;
    }
    for hospital in &args.toggle_hospitals {
        settings.toggle_hospital(hospital);
    }
    let levels = &mut settings.urgency_levels;
    levels.high = args.high.unwrap_or(levels.high);
    levels.medium = args.medium.unwrap_or(levels.medium);
    levels.low = args.low.unwrap_or(levels.low);
    let methods = &mut settings.notification_methods;
    methods.push = args.push.unwrap_or(methods.push);
    methods.email = args.email.unwrap_or(methods.email);
    methods.sms = args.sms.unwrap_or(methods.sms);
}

async fn handle_notifications(
    command: &NotificationCommand,
    state: &AppState,
    format: OutputFormat,
) -> Result<()> {
    let token = state.session.require_token().await?;
    let api = state.api();

    match command {
        NotificationCommand::List { unread } => {
            let fetched = api.notifications(&token).await;
            warn_fallback(&fetched, "Les notifications");
            let views: Vec<NotificationView> = fetched
                .value()
                .iter()
                .map(NotificationView::from_dto)
                .filter(|n| !*unread || !n.is_read)
                .collect();
            let now = Utc::now();
            emit(format, &views, |v| render::notification_lines(v, now))
        }
        NotificationCommand::Read { notification_id } => {
            api.mark_notification_read(&token, notification_id).await?;
            done(format, "Notification marquée comme lue")
        }
        NotificationCommand::ReadAll => {
            api.mark_all_notifications_read(&token).await?;
            done(format, "Toutes les notifications sont lues")
        }
        NotificationCommand::Settings => {
            let fetched = api.notification_settings(&token).await;
            warn_fallback(&fetched, "Les préférences de notification");
            emit(format, fetched.value(), render::notification_settings)
        }
        NotificationCommand::UpdateSettings(args) => {
            let settings = update_settings(api, &token, args).await?;
            emit(format, &settings, |s| {
                format!("{} Préférences enregistrées\n{}", "✓".green().bold(), render::notification_settings(s))
            })
        }
    }
}
