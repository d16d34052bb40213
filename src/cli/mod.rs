// Gateway module for cli - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod args;
mod commands;
mod render;

// Public re-exports - the ONLY way to access cli functionality
pub use args::{
    Cli, Commands, NotificationCommand, PledgeCommand, ProfileCommand, RequestSource,
    OutputFormat,
};
pub use commands::{handle_command, init};
