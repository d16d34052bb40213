use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::{BloodDonationRequestDto, NewBloodRequest};
use crate::domain::Fetched;
use crate::utils::ApiError;

const LIST_KEY: &str = "bloodDonationRequests";

impl ApiClient {
    /// Requests visible without an account; failures degrade to an empty list
    pub async fn public_requests(&self) -> Fetched<Vec<BloodDonationRequestDto>> {
        info!("Fetching public blood donation requests");
        let result = self
            .request_list("/BloodDonationRequests", RequestOptions::get(), None, LIST_KEY)
            .await
            .inspect_err(|e| warn!("Public requests unavailable: {}", e));
        Fetched::or_default(result)
    }

    /// Requests as seen by the signed-in donor; failures degrade to an empty list
    pub async fn authenticated_requests(&self, token: &str) -> Fetched<Vec<BloodDonationRequestDto>> {
        info!("Fetching authenticated blood donation requests");
        let result = self
            .request_list("/BloodDonationRequests", RequestOptions::get(), Some(token), LIST_KEY)
            .await
            .inspect_err(|e| warn!("Authenticated requests unavailable: {}", e));
        Fetched::or_default(result)
    }

    /// Requests from centers the donor subscribed to
    pub async fn subscribed_requests(&self, token: &str) -> Result<Vec<BloodDonationRequestDto>, ApiError> {
        self.request_list(
            "/BloodDonationRequests/subscribed",
            RequestOptions::get(),
            Some(token),
            LIST_KEY,
        )
        .await
    }

    /// Requests matching the donor's blood group
    pub async fn matching_requests(&self, token: &str) -> Result<Vec<BloodDonationRequestDto>, ApiError> {
        self.request_list(
            "/BloodDonationRequests/matching",
            RequestOptions::get(),
            Some(token),
            LIST_KEY,
        )
        .await
    }

    pub async fn requests_by_center(
        &self,
        center_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<BloodDonationRequestDto>, ApiError> {
        let path = format!("/BTC/{}/bloodDonationRequests", center_id);
        self.request_list(&path, RequestOptions::get(), token, LIST_KEY)
            .await
    }

    pub async fn nearby_requests(
        &self,
        token: &str,
        radius_km: u32,
    ) -> Result<Vec<BloodDonationRequestDto>, ApiError> {
        let options = RequestOptions::get().with_query("radius", radius_km);
        self.request_list("/BloodDonationRequests/nearby", options, Some(token), LIST_KEY)
            .await
    }

    pub async fn create_request(
        &self,
        token: &str,
        request: &NewBloodRequest,
    ) -> Result<Option<Value>, ApiError> {
        info!("Creating blood donation request for group {}", request.blood_group);
        let options = RequestOptions::json(Method::POST, request)?;
        self.request("/BloodDonationRequests", options, Some(token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_list_accepts_wrapped_and_bare_arrays() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/BloodDonationRequests")
            .with_status(200)
            .with_body(r#"{"bloodDonationRequests":[{"id":"r1","bloodGroup":7}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/BloodDonationRequests/matching")
            .with_status(200)
            .with_body(r#"[{"id":"r2"}]"#)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let public = client.public_requests().await;
        assert!(public.is_live());
        assert_eq!(public.value()[0].blood_group, Some(7));

        let matching = client.matching_requests("t").await.unwrap();
        assert_eq!(matching[0].id.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_failed_list_is_an_explicit_fallback() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/BloodDonationRequests")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let fetched = client.authenticated_requests("t").await;
        assert!(!fetched.is_live());
        assert!(fetched.value().is_empty());
        assert_eq!(fetched.cause().and_then(|c| c.status()), Some(500));
    }

    #[tokio::test]
    async fn test_nearby_sends_radius() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/BloodDonationRequests/nearby")
            .match_query(Matcher::UrlEncoded("radius".into(), "25".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        assert!(client.nearby_requests("t", 25).await.unwrap().is_empty());
        mock.assert_async().await;
    }
}
