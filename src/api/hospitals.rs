use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::BtcDto;
use crate::domain::Fetched;
use crate::utils::ApiError;

const LIST_KEY: &str = "bloodTansfusionCenters";

impl ApiClient {
    /// Blood transfusion centers; with a token the subscription flag is filled in
    pub async fn centers(&self, token: Option<&str>) -> Fetched<Vec<BtcDto>> {
        info!(
            "Fetching blood transfusion centers{}",
            if token.is_some() { " (authenticated)" } else { "" }
        );
        let result = self
            .request_list("/BTC", RequestOptions::get(), token, LIST_KEY)
            .await
            .inspect_err(|e| warn!("Centers unavailable: {}", e));
        Fetched::or_default(result)
    }

    pub async fn subscribe_to_center(&self, token: &str, center_id: &str) -> Result<Option<Value>, ApiError> {
        info!("Subscribing to center {}", center_id);
        let options =
            RequestOptions::json(Method::POST, &json!({ "bloodTansfusionCenterId": center_id }))?;
        self.request("/Subscriptions", options, Some(token)).await
    }

    pub async fn unsubscribe_from_center(&self, token: &str, center_id: &str) -> Result<Option<Value>, ApiError> {
        info!("Unsubscribing from center {}", center_id);
        self.request(
            &format!("/Subscriptions/btc/{}", center_id),
            RequestOptions::method(Method::DELETE),
            Some(token),
        )
        .await
    }

    pub async fn subscribed_centers(&self, token: &str) -> Result<Vec<BtcDto>, ApiError> {
        self.request_list("/BTC/subscribed", RequestOptions::get(), Some(token), LIST_KEY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_centers_unwrap_and_fallback() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/BTC")
            .match_header("authorization", "Bearer t")
            .with_status(200)
            .with_body(r#"{"bloodTansfusionCenters":[{"id":"b1","loggedUserSubscribed":true}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/BTC")
            .match_header("authorization", Matcher::Missing)
            .with_status(503)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let live = client.centers(Some("t")).await;
        assert!(live.is_live());
        assert_eq!(live.value()[0].logged_user_subscribed, Some(true));

        let fallback = client.centers(None).await;
        assert!(!fallback.is_live());
        assert!(fallback.value().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_round() {
        let mut server = Server::new_async().await;
        let subscribe = server
            .mock("POST", "/Subscriptions")
            .match_body(Matcher::Json(json!({"bloodTansfusionCenterId": "b1"})))
            .with_status(201)
            .with_body(r#"{"id":"s1"}"#)
            .create_async()
            .await;
        let unsubscribe = server
            .mock("DELETE", "/Subscriptions/btc/b1")
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        client.subscribe_to_center("t", "b1").await.unwrap();
        client.unsubscribe_from_center("t", "b1").await.unwrap();
        subscribe.assert_async().await;
        unsubscribe.assert_async().await;
    }
}
