use crate::utils::ApiError;

/// Outcome of a fetch that degrades to a fallback value instead of failing.
///
/// Callers may use the value either way; `Fallback` keeps the cause so that
/// "the server said nothing" and "the server was unavailable" stay distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback { value: T, cause: ApiError },
}

impl<T> Fetched<T> {
    pub fn fallback(value: T, cause: ApiError) -> Self {
        Fetched::Fallback { value, cause }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Fetched::Live(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Live(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetched::Live(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    pub fn cause(&self) -> Option<&ApiError> {
        match self {
            Fetched::Live(_) => None,
            Fetched::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Fetched::Live(value) => Fetched::Live(f(value)),
            Fetched::Fallback { value, cause } => Fetched::Fallback {
                value: f(value),
                cause,
            },
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Live on success, default value on failure
    pub fn or_default(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Fetched::Live(value),
            Err(cause) => Fetched::fallback(T::default(), cause),
        }
    }
}
