use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use super::client::{ApiClient, RequestOptions};
use super::types::{NewPledge, PledgeDto, PledgeFilter};
use crate::constants::PLEDGE_STATUS_COMPLETED;
use crate::utils::ApiError;

impl ApiClient {
    pub async fn create_pledge(&self, token: &str, pledge: &NewPledge) -> Result<Option<Value>, ApiError> {
        info!("Creating pledge for request {}", pledge.blood_donation_request_id);
        let options = RequestOptions::json(Method::POST, pledge)?;
        self.request("/Pledges", options, Some(token)).await
    }

    pub async fn list_pledges(&self, token: &str, filter: &PledgeFilter) -> Result<Vec<PledgeDto>, ApiError> {
        let options = filter
            .to_query()
            .into_iter()
            .fold(RequestOptions::get(), |options, (key, value)| {
                options.with_query(key, value)
            });
        self.request_list("/Pledges", options, Some(token), "pledges")
            .await
    }

    pub async fn update_pledge_status(
        &self,
        token: &str,
        pledge_id: &str,
        status: i32,
    ) -> Result<Option<Value>, ApiError> {
        let options = RequestOptions::json(Method::PATCH, &json!({ "evolutionStatus": status }))?;
        self.request(&format!("/Pledges/{}", pledge_id), options, Some(token))
            .await
    }

    pub async fn cancel_pledge(&self, token: &str, pledge_id: &str) -> Result<Option<Value>, ApiError> {
        info!("Cancelling pledge {}", pledge_id);
        self.request(
            &format!("/Pledges/{}", pledge_id),
            RequestOptions::method(Method::DELETE),
            Some(token),
        )
        .await
    }

    pub async fn complete_pledge(&self, token: &str, pledge_id: &str) -> Result<Option<Value>, ApiError> {
        self.update_pledge_status(token, pledge_id, PLEDGE_STATUS_COMPLETED)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_list_sends_only_set_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/Pledges")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("evolutionStatus".into(), "1".into()),
                Matcher::UrlEncoded("paginationTake".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id":"p1","evolutionStatus":1}]"#)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let filter = PledgeFilter {
            evolution_status: Some(1),
            pagination_take: Some(10),
            pagination_skip: None,
        };
        let pledges = client.list_pledges("t", &filter).await.unwrap();
        assert_eq!(pledges.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_patches_status_three() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/Pledges/p1")
            .match_header("authorization", "Bearer t")
            .match_body(Matcher::Json(json!({"evolutionStatus": 3})))
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        assert_eq!(client.complete_pledge("t", "p1").await.unwrap(), None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_and_cancel() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/Pledges")
            .match_body(Matcher::Json(json!({
                "bloodDonationRequestId": "r1",
                "pledgeNotes": "demain matin"
            })))
            .with_status(201)
            .with_body(r#"{"id":"p9"}"#)
            .create_async()
            .await;
        let cancel = server
            .mock("DELETE", "/Pledges/p9")
            .with_status(200)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let pledge = NewPledge {
            blood_donation_request_id: "r1".to_string(),
            pledge_date: None,
            pledge_notes: Some("demain matin".to_string()),
        };
        let created = client.create_pledge("t", &pledge).await.unwrap();
        assert_eq!(created, Some(json!({"id": "p9"})));
        client.cancel_pledge("t", "p9").await.unwrap();

        create.assert_async().await;
        cancel.assert_async().await;
    }
}
