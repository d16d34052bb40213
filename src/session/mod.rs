// Gateway module for session - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod manager;
mod normalize;
mod state;

// Public re-exports - the ONLY way to access session functionality
pub use manager::SessionManager;
pub use normalize::{record_from_login, record_from_profile};
pub use state::{SessionState, SessionStatus};
