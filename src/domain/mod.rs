// Gateway module for domain - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod blood_group;
mod fetched;
mod filters;
mod lookups;
mod session;
mod views;

// Public re-exports - the ONLY way to access domain functionality
pub use blood_group::{
    display_blood_type, session_label, view_label, BloodGroup, UNKNOWN_BLOOD_TYPE,
    UNKNOWN_BLOOD_TYPE_SHORT,
};
pub use fetched::Fetched;
pub use filters::{DonorFilter, HospitalFilter, RequestFilter};
pub use lookups::{ContactMethod, DonationType, RequestPriority};
pub use session::{NotificationPreferences, PrivacySettings, ProfileUpdate, SessionRecord};
pub use views::{
    badges_for, deadline_label, elapsed_label, parse_timestamp, BloodRequestView,
    DonationStatus, DonationSummary, DonationView, DonorView, HospitalKind, HospitalView,
    NotificationKind, NotificationView, PledgeStatus, PledgeView, Urgency,
};
