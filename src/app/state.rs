use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::app::{get_data_dir, Config};
use crate::session::SessionManager;
use crate::storage::{FileStore, SessionStore};

/// Global application state
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,
    /// Current session, shared with background tasks
    pub session: Arc<SessionManager>,
}

impl AppState {
    /// Wire the API client and file-backed stores from `config`
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config.api).context("Failed to build HTTP client")?;

        let data_dir = get_data_dir(&config)?;
        let store = SessionStore::new(
            Arc::new(FileStore::new(data_dir.join("general"))),
            Arc::new(FileStore::protected(data_dir.join("secure"))),
        );

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            session: Arc::new(SessionManager::new(api, store)),
        })
    }

    /// API client bound to the configured server
    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    /// Update configuration
    pub async fn update_config(&self, new_config: Config) {
        let mut config = self.config.write().await;
        *config = new_config;
    }
}
