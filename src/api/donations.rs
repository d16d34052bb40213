use serde_json::Value;
use tracing::{info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::{DonationDto, DonationStats};
use crate::domain::Fetched;
use crate::utils::ApiError;

const LIST_KEY: &str = "donations";

impl ApiClient {
    /// Donation history from `/donations`, then `/donor/donations`; empty when both fail
    pub async fn donations(&self, token: &str) -> Fetched<Vec<DonationDto>> {
        info!("Fetching user donations");
        let primary = self
            .request_list("/donations", RequestOptions::get(), Some(token), LIST_KEY)
            .await;
        let result = match primary {
            Ok(donations) => Ok(donations),
            Err(e) => {
                warn!("Primary donations endpoint failed ({}), trying alternative", e);
                self.request_list("/donor/donations", RequestOptions::get(), Some(token), LIST_KEY)
                    .await
                    .inspect_err(|e| warn!("Donation history unavailable: {}", e))
            }
        };
        Fetched::or_default(result)
    }

    /// Aggregates; zeroed when unavailable
    pub async fn donation_stats(&self, token: &str) -> Fetched<DonationStats> {
        let result = self
            .request_or_default("/donations/stats", RequestOptions::get(), Some(token))
            .await
            .inspect_err(|e| warn!("Donation stats unavailable: {}", e));
        Fetched::or_default(result)
    }

    pub async fn donation_certificate(&self, token: &str, donation_id: &str) -> Result<Option<Value>, ApiError> {
        info!("Downloading certificate for donation {}", donation_id);
        self.request(
            &format!("/donations/{}/certificate", donation_id),
            RequestOptions::get(),
            Some(token),
        )
        .await
    }
}
