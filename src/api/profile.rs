use reqwest::Method;
use serde_json::Value;

use super::client::{ApiClient, RequestOptions};
use super::types::{DonorProfilePatch, UserDto, UserProfileResponse};
use crate::utils::ApiError;

impl ApiClient {
    /// `GET /user`, optionally for a given user id; `None` when no user came back
    pub async fn user_profile(&self, token: &str, user_id: Option<&str>) -> Result<Option<UserDto>, ApiError> {
        let options = match user_id {
            Some(id) => RequestOptions::get().with_query("userId", id),
            None => RequestOptions::get(),
        };
        let response: Option<UserProfileResponse> = self.request("/user", options, Some(token)).await?;
        Ok(response.and_then(UserProfileResponse::into_user))
    }

    /// `PATCH /donor/profile` with only the fields that changed
    pub async fn update_donor_profile(
        &self,
        token: &str,
        patch: &DonorProfilePatch,
    ) -> Result<Option<Value>, ApiError> {
        let options = RequestOptions::json(Method::PATCH, patch)?;
        self.request("/donor/profile", options, Some(token)).await
    }
}
