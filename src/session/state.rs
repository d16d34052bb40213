use serde::Serialize;
use std::fmt;

use crate::domain::SessionRecord;

/// Lifecycle of the current session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Initial state until the store has been read
    #[default]
    Restoring,
    Unauthenticated,
    Authenticated(SessionRecord),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Restoring => SessionStatus::Restoring,
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn record(&self) -> Option<&SessionRecord> {
        match self {
            SessionState::Authenticated(record) => Some(record),
            _ => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut SessionRecord> {
        match self {
            SessionState::Authenticated(record) => Some(record),
            _ => None,
        }
    }
}

/// Observable status without the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Restoring,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Restoring => "restoring",
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}
