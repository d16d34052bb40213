use std::sync::Arc;
use tracing::debug;

use super::traits::KeyValueStore;
use crate::constants::{REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
use crate::domain::SessionRecord;
use crate::utils::StorageError;

/// Durable home of the current session record.
///
/// The profile blob goes to the general store; the bearer token lives only
/// in the protected store. Writes are not transactional: a failure between
/// the two leaves them out of step until the next `save` or `clear`.
#[derive(Clone)]
pub struct SessionStore {
    general: Arc<dyn KeyValueStore>,
    protected: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(general: Arc<dyn KeyValueStore>, protected: Arc<dyn KeyValueStore>) -> Self {
        Self { general, protected }
    }

    /// Persist `record`, splitting the token off into the protected store
    pub async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut blob = record.clone();
        let token = blob.token.take();

        self.general
            .set(USER_KEY, &serde_json::to_string(&blob)?)
            .await?;

        match token {
            Some(token) => self.protected.set(TOKEN_KEY, &token).await?,
            // A stale token must not be re-attached to a tokenless record
            None => self.protected.remove(TOKEN_KEY).await?,
        }
        debug!("Session record saved for user {}", record.id);
        Ok(())
    }

    /// Rebuild the stored record, re-attaching the token when one is present
    pub async fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(raw) = self.general.get(USER_KEY).await? else {
            return Ok(None);
        };
        let mut record: SessionRecord = serde_json::from_str(&raw)?;
        record.token = self.protected.get(TOKEN_KEY).await?;
        Ok(Some(record))
    }

    /// Stored token alone, without parsing the profile
    pub async fn token(&self) -> Result<Option<String>, StorageError> {
        self.protected.get(TOKEN_KEY).await
    }

    /// Remove the profile, token and refresh token.
    ///
    /// Every key is attempted; the first failure is reported.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let results = [
            self.general.remove(USER_KEY).await,
            self.protected.remove(TOKEN_KEY).await,
            self.protected.remove(REFRESH_TOKEN_KEY).await,
        ];
        results.into_iter().collect::<Result<Vec<_>, _>>()?;
        debug!("Session storage cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore, MockKeyValueStore};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file_backed(root: &std::path::Path) -> SessionStore {
        SessionStore::new(
            Arc::new(FileStore::new(root.join("general"))),
            Arc::new(FileStore::protected(root.join("secure"))),
        )
    }

    fn record() -> SessionRecord {
        let mut record = SessionRecord::new("u1", "Amina", "amina@example.dz").with_token("t1");
        record.donor_blood_group = Some(7);
        record.blood_type = Some("O+".to_string());
        record
    }

    #[tokio::test]
    async fn test_round_trip_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        file_backed(temp_dir.path()).save(&record()).await.unwrap();

        // A fresh instance stands in for the next process lifetime
        let loaded = file_backed(temp_dir.path()).load().await.unwrap();
        assert_eq!(loaded, Some(record()));
    }

    #[tokio::test]
    async fn test_token_never_written_to_general_store() {
        let general = Arc::new(MemoryStore::new());
        let protected = Arc::new(MemoryStore::new());
        let store = SessionStore::new(general.clone(), protected.clone());
        store.save(&record()).await.unwrap();

        let blob = general.get(USER_KEY).await.unwrap().unwrap();
        assert!(!blob.contains("t1"));
        assert_eq!(protected.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_latest_token_wins() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        store.save(&record()).await.unwrap();
        store.save(&record().with_token("t2")).await.unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().token.as_deref(), Some("t2"));

        let mut tokenless = record();
        tokenless.token = None;
        store.save(&tokenless).await.unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().token, None);
    }

    #[tokio::test]
    async fn test_clear_then_load_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = file_backed(temp_dir.path());
        store.save(&record()).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(store.token().await.unwrap(), None);

        // Clearing an empty store is fine too
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let general = Arc::new(MemoryStore::new());
        general.set(USER_KEY, "{not json").await.unwrap();
        let store = SessionStore::new(general, Arc::new(MemoryStore::new()));
        assert!(matches!(
            store.load().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_attempts_every_key() {
        let mut protected = MockKeyValueStore::new();
        protected
            .expect_remove()
            .withf(|key| key == TOKEN_KEY)
            .times(1)
            .returning(|_| Err(StorageError::Unavailable("keystore locked".to_string())));
        protected
            .expect_remove()
            .withf(|key| key == REFRESH_TOKEN_KEY)
            .times(1)
            .returning(|_| Ok(()));

        let general = Arc::new(MemoryStore::new());
        general.set(USER_KEY, "{}").await.unwrap();
        let store = SessionStore::new(general.clone(), Arc::new(protected));

        assert!(store.clear().await.is_err());
        assert_eq!(general.get(USER_KEY).await.unwrap(), None);
    }
}
