use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::normalize::{record_from_login, record_from_profile};
use super::state::{SessionState, SessionStatus};
use crate::api::{ApiClient, DonorProfilePatch, RegisterData};
use crate::domain::{ProfileUpdate, SessionRecord};
use crate::storage::SessionStore;
use crate::utils::{ApiError, SessionError};

/// Connection failures get their own user-facing message
fn api_failure(err: ApiError) -> SessionError {
    if err.is_unreachable() {
        SessionError::Unreachable(err)
    } else {
        SessionError::Api(err)
    }
}

/// Local fields mirrored after a successful `PATCH /donor/profile`
fn local_update(patch: &DonorProfilePatch) -> ProfileUpdate {
    let name_parts: Vec<&str> = [patch.first_name.as_deref(), patch.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    let name = (!name_parts.is_empty()).then(|| name_parts.join(" "));

    ProfileUpdate {
        donor_name: name.clone(),
        name,
        donor_tel: patch.donor_tel.clone(),
        donor_blood_group: patch.donor_blood_group,
        donor_contact_method: patch.donor_contact_method,
        donor_want_to_stay_anonymous: patch.donor_want_to_stay_anonymous,
        donor_exclude_from_public_portal: patch.donor_excluded_from_public_portal,
        ..Default::default()
    }
}

/// Owner of the current session.
///
/// One instance is created per process and shared as `Arc<SessionManager>`.
/// Every transition goes through it; the store only ever mirrors its state.
pub struct SessionManager {
    api: ApiClient,
    store: SessionStore,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::Restoring),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.status().await == SessionStatus::Authenticated
    }

    /// Snapshot of the authenticated record
    pub async fn current(&self) -> Option<SessionRecord> {
        self.state.read().await.record().cloned()
    }

    /// Bearer token of the authenticated user
    pub async fn token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .record()
            .and_then(|record| record.token.clone())
    }

    /// Token or `NotAuthenticated`, for actions that require a login
    pub async fn require_token(&self) -> Result<String, SessionError> {
        self.token().await.ok_or(SessionError::NotAuthenticated)
    }

    /// Adopt the stored record, if any.
    ///
    /// A record that cannot be read is cleared and the session starts
    /// unauthenticated.
    pub async fn restore(&self) -> SessionStatus {
        let next = match self.store.load().await {
            Ok(Some(record)) => {
                info!("Restored session for user {}", record.id);
                SessionState::Authenticated(record)
            }
            Ok(None) => {
                debug!("No stored session");
                SessionState::Unauthenticated
            }
            Err(e) => {
                error!("Stored session unreadable, clearing it: {}", e);
                if let Err(e) = self.store.clear().await {
                    error!("Failed to clear session storage: {}", e);
                }
                SessionState::Unauthenticated
            }
        };

        let mut state = self.state.write().await;
        *state = next;
        state.status()
    }

    /// Fetch the current profile and overwrite the in-memory record.
    ///
    /// Returns whether the refreshed record was applied. Nothing is applied
    /// when the user logged out or changed while the request was in flight.
    pub async fn refresh_profile(&self) -> Result<bool, SessionError> {
        let Some((user_id, token)) = self.state.read().await.record().and_then(|record| {
            record
                .token
                .clone()
                .map(|token| (record.id.clone(), token))
        }) else {
            return Ok(false);
        };

        let Some(user) = self.api.user_profile(&token, Some(&user_id)).await.map_err(api_failure)?
        else {
            debug!("Profile refresh returned no user");
            return Ok(false);
        };

        let refreshed = record_from_profile(&user, &user_id, Some(token.clone()));
        Ok(self.adopt_refreshed(&user_id, &token, refreshed).await)
    }

    async fn adopt_refreshed(&self, user_id: &str, token: &str, refreshed: SessionRecord) -> bool {
        let mut state = self.state.write().await;
        let unchanged = state
            .record()
            .is_some_and(|r| r.id == user_id && r.token.as_deref() == Some(token));
        if !unchanged {
            debug!("Discarding profile refresh for {}: session changed", user_id);
            return false;
        }

        if let Err(e) = self.store.save(&refreshed).await {
            warn!("Failed to persist refreshed profile: {}", e);
        }
        info!("Profile refreshed for user {}", refreshed.id);
        *state = SessionState::Authenticated(refreshed);
        true
    }

    /// Restore, then refresh in the background.
    ///
    /// Refresh failures are logged only; the restored record stands.
    pub async fn bootstrap(self: &Arc<Self>) -> (SessionStatus, Option<JoinHandle<()>>) {
        let status = self.restore().await;
        if status != SessionStatus::Authenticated {
            return (status, None);
        }

        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            if let Err(e) = manager.refresh_profile().await {
                warn!("Background profile refresh failed: {}", e);
            }
        });
        (status, Some(handle))
    }

    async fn establish(&self, email: &str, password: &str) -> Result<SessionRecord, ApiError> {
        let login = self.api.login(email, password).await?;
        let record = record_from_login(email, &login);

        *self.state.write().await = SessionState::Authenticated(record.clone());
        if let Err(e) = self.store.save(&record).await {
            warn!("Logged in but failed to persist session: {}", e);
        }
        info!("Login successful for user {}", record.id);
        Ok(record)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionRecord, SessionError> {
        self.establish(email, password).await.map_err(|e| {
            if e.is_unreachable() {
                SessionError::Unreachable(e)
            } else {
                SessionError::InvalidCredentials(e)
            }
        })
    }

    /// Register, then log in with the same credentials.
    ///
    /// Login is never attempted when registration fails.
    pub async fn register(&self, data: &RegisterData) -> Result<SessionRecord, SessionError> {
        let classify = |e: ApiError| {
            if e.is_unreachable() {
                SessionError::Unreachable(e)
            } else {
                SessionError::RegistrationFailed(e)
            }
        };

        self.api.register(data).await.map_err(classify)?;
        info!("Registration accepted for {}", data.email);
        self.establish(&data.email, &data.password)
            .await
            .map_err(classify)
    }

    /// Forget the session in memory, then in storage.
    ///
    /// A storage failure is logged; the session is logged out regardless.
    pub async fn logout(&self) {
        let previous = std::mem::replace(&mut *self.state.write().await, SessionState::Unauthenticated);
        if let Some(record) = previous.record() {
            info!("Logging out user {}", record.id);
        }
        if let Err(e) = self.store.clear().await {
            error!("Failed to clear session storage on logout: {}", e);
        }
    }

    /// Merge `update` into the current record and persist the result
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<SessionRecord, SessionError> {
        let mut state = self.state.write().await;
        let record = state.record_mut().ok_or(SessionError::NotAuthenticated)?;
        record.apply(update);
        let merged = record.clone();

        self.store.save(&merged).await?;
        debug!("Profile updated for user {}", merged.id);
        Ok(merged)
    }

    /// Send `patch` to the server, then mirror it locally
    pub async fn save_profile(&self, patch: DonorProfilePatch) -> Result<SessionRecord, SessionError> {
        let token = self.require_token().await?;
        self.api
            .update_donor_profile(&token, &patch)
            .await
            .map_err(api_failure)?;
        self.update_profile(local_update(&patch)).await
    }
}
