use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::{NotificationDto, NotificationSettings};
use crate::domain::Fetched;
use crate::utils::ApiError;

impl ApiClient {
    pub async fn notifications(&self, token: &str) -> Fetched<Vec<NotificationDto>> {
        info!("Fetching user notifications");
        let result = self
            .request_list("/notifications", RequestOptions::get(), Some(token), "notifications")
            .await
            .inspect_err(|e| warn!("Notifications unavailable: {}", e));
        Fetched::or_default(result)
    }

    pub async fn mark_notification_read(&self, token: &str, notification_id: &str) -> Result<Option<Value>, ApiError> {
        self.request(
            &format!("/notifications/{}/read", notification_id),
            RequestOptions::method(Method::PATCH),
            Some(token),
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self, token: &str) -> Result<Option<Value>, ApiError> {
        self.request(
            "/notifications/mark-all-read",
            RequestOptions::method(Method::PATCH),
            Some(token),
        )
        .await
    }

    /// Server-side settings; defaults (on, high and medium urgency, push only) when unavailable
    pub async fn notification_settings(&self, token: &str) -> Fetched<NotificationSettings> {
        let result = self
            .request_or_default("/notifications/settings", RequestOptions::get(), Some(token))
            .await
            .inspect_err(|e| warn!("Notification settings unavailable: {}", e));
        Fetched::or_default(result)
    }

    pub async fn update_notification_settings(
        &self,
        token: &str,
        settings: &NotificationSettings,
    ) -> Result<Option<Value>, ApiError> {
        info!("Updating notification settings");
        let options = RequestOptions::json(Method::PUT, settings)?;
        self.request("/notifications/settings", options, Some(token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_settings_fallback_defaults() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/notifications/settings")
            .with_status(404)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let fetched = client.notification_settings("t").await;
        assert!(!fetched.is_live());
        let settings = fetched.into_value();
        assert!(settings.enable_notifications);
        assert!(settings.urgency_levels.high && settings.urgency_levels.medium);
        assert!(!settings.urgency_levels.low);
        assert!(settings.notification_methods.push && !settings.notification_methods.sms);
    }

    #[tokio::test]
    async fn test_update_settings_puts_full_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/notifications/settings")
            .match_body(Matcher::PartialJson(json!({
                "enableNotifications": false,
                "subscribedHospitals": ["h1"]
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let mut settings = NotificationSettings::default();
        settings.enable_notifications = false;
        settings.toggle_hospital("h1");
        client.update_notification_settings("t", &settings).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mark_read_routes() {
        let mut server = Server::new_async().await;
        let one = server
            .mock("PATCH", "/notifications/n1/read")
            .with_status(204)
            .create_async()
            .await;
        let all = server
            .mock("PATCH", "/notifications/mark-all-read")
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        client.mark_notification_read("t", "n1").await.unwrap();
        client.mark_all_notifications_read("t").await.unwrap();
        one.assert_async().await;
        all.assert_async().await;
    }
}
