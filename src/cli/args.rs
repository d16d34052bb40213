use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::{BloodGroup, PledgeStatus, Urgency};

#[derive(Parser, Debug)]
#[command(name = "donorconnect")]
#[command(version)]
#[command(about = "Blood donation coordination from the command line", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show session and server status
    Status,
    /// Log in with e-mail and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "DONORCONNECT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, then log in
    Register(RegisterArgs),
    /// Forget the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show or edit the donor profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// List blood requests
    Requests(RequestArgs),
    /// Publish a blood request
    RequestCreate(RequestCreateArgs),
    /// Browse the donor directory
    Donors(DonorArgs),
    /// Browse blood transfusion centers
    Hospitals(HospitalArgs),
    /// Follow a center's requests
    Subscribe { center_id: String },
    /// Stop following a center
    Unsubscribe { center_id: String },
    /// Manage pledges
    #[command(subcommand)]
    Pledge(PledgeCommand),
    /// Donation history
    Donations {
        /// Server-side totals only
        #[arg(long)]
        stats: bool,
    },
    /// Fetch the certificate of a donation
    Certificate { donation_id: String },
    /// Notifications and their settings
    #[command(subcommand)]
    Notifications(NotificationCommand),
    /// List wilayas
    Wilayas,
    /// List communes
    Communes {
        /// Only communes of this wilaya
        #[arg(long)]
        wilaya: Option<i64>,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long, env = "DONORCONNECT_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub blood_type: BloodGroup,
    #[arg(long)]
    pub wilaya: String,
    /// Date of the last donation (YYYY-MM-DD)
    #[arg(long)]
    pub last_donation: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub blood_type: Option<BloodGroup>,
    /// 1 phone call, 2 text message, 3 any
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=3))]
    pub contact_method: Option<i32>,
    #[arg(long)]
    pub anonymous: Option<bool>,
    #[arg(long)]
    pub hide_from_public: Option<bool>,
    #[arg(long)]
    pub wilaya_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestSource {
    /// Every open request
    All,
    /// Requests of followed centers
    Subscribed,
    /// Requests matching the donor's group
    Matching,
    /// Requests close to the donor
    Nearby,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[arg(long, value_enum, default_value_t = RequestSource::All)]
    pub source: RequestSource,
    /// Requests of one center
    #[arg(long, conflicts_with = "source")]
    pub center: Option<String>,
    /// Radius for `--source nearby`, in km
    #[arg(long)]
    pub radius: Option<u32>,
    /// Text searched in hospital and location
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub urgency: Option<Urgency>,
    #[arg(long)]
    pub blood_type: Option<BloodGroup>,
    #[arg(long)]
    pub wilaya: Option<String>,
    /// Only requests the logged-in donor can answer
    #[arg(long)]
    pub compatible: bool,
}

#[derive(Args, Debug)]
pub struct RequestCreateArgs {
    #[arg(long)]
    pub blood_type: BloodGroup,
    /// 1 low, 2 standard, 3 critical
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(i64).range(1..=3))]
    pub priority: i64,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: String,
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
    #[arg(long)]
    pub details: Option<String>,
}

#[derive(Args, Debug)]
pub struct DonorArgs {
    /// Server-side search on names
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub blood_type: Option<BloodGroup>,
    #[arg(long)]
    pub wilaya: Option<String>,
}

#[derive(Args, Debug)]
pub struct HospitalArgs {
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub wilaya: Option<String>,
    /// Only followed centers
    #[arg(long)]
    pub subscribed: bool,
}

#[derive(Subcommand, Debug)]
pub enum PledgeCommand {
    /// Pledge to answer a request
    Create {
        request_id: String,
        /// Planned donation date
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    List {
        /// Completed and cancelled are filtered by the server; active within the page
        #[arg(long)]
        status: Option<PledgeStatus>,
        #[arg(long)]
        take: Option<u32>,
        #[arg(long)]
        skip: Option<u32>,
    },
    Cancel { pledge_id: String },
    Complete { pledge_id: String },
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommand {
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    Read { notification_id: String },
    ReadAll,
    Settings,
    UpdateSettings(NotificationSettingsArgs),
}

#[derive(Args, Debug, Default)]
pub struct NotificationSettingsArgs {
    #[arg(long)]
    pub enable: Option<bool>,
    /// Add or remove a center from the followed set
    #[arg(long = "toggle-hospital")]
    pub toggle_hospitals: Vec<String>,
    #[arg(long)]
    pub high: Option<bool>,
    #[arg(long)]
    pub medium: Option<bool>,
    #[arg(long)]
    pub low: Option<bool>,
    #[arg(long)]
    pub push: Option<bool>,
    #[arg(long)]
    pub email: Option<bool>,
    #[arg(long)]
    pub sms: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
