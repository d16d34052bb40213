// Gateway module for api - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod auth;
mod client;
mod donations;
mod donors;
mod hospitals;
mod locations;
mod notifications;
mod pledges;
mod profile;
mod requests;
mod types;

// Public re-exports - the ONLY way to access api functionality
pub use auth::extract_user_id;
pub use client::{bearer_value, unwrap_listing, ApiClient, RequestOptions};
pub use types::{
    BloodDonationRequestDto, BtcDto, CommuneDto, DonationDto, DonationStats, DonorProfilePatch,
    LoginResponseDto, LoginResult, NewBloodRequest, NewPledge, NotificationDto,
    NotificationMethods, NotificationSettings, PledgeDto, PledgeFilter, RegisterData,
    RequestSummaryDto, UrgencyLevels, UserDto, UserProfileResponse, WilayaDto,
};
