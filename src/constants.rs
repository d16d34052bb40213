/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:57679";
pub const ENV_PREFIX: &str = "DONORCONNECT_";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Storage keys
pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

// Query defaults
pub const PUBLIC_LEVEL: u8 = 1;
pub const AUTHENTICATED_DONOR_LEVEL: u8 = 2;
pub const DEFAULT_NEARBY_RADIUS_KM: u32 = 10;

// Pledge evolution status codes as understood by the backend
pub const PLEDGE_STATUS_COMPLETED: i32 = 3;
pub const PLEDGE_STATUS_CANCELLED: i32 = 4;

// Request evolution status treated as closed
pub const REQUEST_STATUS_CLOSED: i32 = 3;

// Placeholders
pub const UNKNOWN_USER_ID: &str = "unknown-user";
pub const DEFAULT_DISPLAY_NAME: &str = "Utilisateur";
pub const UNKNOWN_HOSPITAL: &str = "Hôpital inconnu";
pub const UNSPECIFIED_LOCATION: &str = "Non spécifiée";
pub const DEFAULT_CONTACT_PERSON: &str = "Responsable";
pub const ANONYMOUS_DONOR: &str = "Donneur anonyme";

// Hospital directory defaults
pub const DEFAULT_OPEN_HOURS: &str = "24h/24, 7j/7";
pub const DEFAULT_BLOOD_BANK_CAPACITY: u32 = 500;
pub const DEFAULT_SPECIALTY: &str = "Transfusion sanguine";

// Urgency horizons (hours until deadline)
pub const CRITICAL_HORIZON_HOURS: i64 = 24;
pub const URGENT_HORIZON_HOURS: i64 = 72;

// Donor badges: (minimum donations, label)
pub const DONOR_BADGES: &[(u32, &str)] = &[
    (1, "Donneur"),
    (5, "Généreux"),
    (10, "Héros"),
    (25, "Légende"),
];

// Volume assumed for a whole-blood donation when the server omits it (ml)
pub const STANDARD_DONATION_VOLUME_ML: u32 = 450;
