pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod session;
pub mod storage;
pub mod utils;

pub use app::{load_config, AppState, Config};
pub use session::{SessionManager, SessionStatus};
pub use utils::DonorError;
