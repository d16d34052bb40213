use async_trait::async_trait;

use crate::utils::StorageError;

/// String-keyed persistent storage.
///
/// Both the general profile store and the protected token store implement
/// this; values are opaque strings (the session layer writes JSON).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written or was removed
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
