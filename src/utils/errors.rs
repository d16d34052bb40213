use thiserror::Error;

/// Failure at the HTTP transport boundary.
///
/// Connection-level failures are told apart from HTTP status failures by the
/// shape of the underlying client error, never by matching message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures where no HTTP response was received
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Failure reading or writing one of the local stores
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// User-facing failures of the session lifecycle.
///
/// The display strings are what the view layer shows in its alert.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Identifiants invalides. Veuillez réessayer.")]
    InvalidCredentials(#[source] ApiError),

    #[error("L'inscription a échoué. Veuillez réessayer.")]
    RegistrationFailed(#[source] ApiError),

    #[error("Impossible de joindre le serveur. Vérifiez votre connexion et l'adresse du serveur.")]
    Unreachable(#[source] ApiError),

    #[error("Vous devez être connecté pour effectuer cette action.")]
    NotAuthenticated,

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Main error type for DonorConnect
#[derive(Error, Debug)]
pub enum DonorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
