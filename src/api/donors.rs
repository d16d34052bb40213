use tracing::{info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::UserDto;
use crate::constants::{AUTHENTICATED_DONOR_LEVEL, PUBLIC_LEVEL};
use crate::domain::BloodGroup;
use crate::utils::ApiError;

const LIST_KEY: &str = "users";

/// Base donor query; anonymous donors are never listed and, without a
/// token, donors who opted out of the public portal are filtered too
fn donor_query(level: u8, token: Option<&str>) -> RequestOptions {
    let options = RequestOptions::get()
        .with_query("level", level)
        .with_query("donorWantToStayAnonymous", false);
    match token {
        Some(_) => options,
        None => options.with_query("donorExcludedFromPublicPortal", false),
    }
}

impl ApiClient {
    /// Public donor directory, retried once on the `/api` prefixed route
    pub async fn public_donors(&self) -> Result<Vec<UserDto>, ApiError> {
        info!("Fetching public non-anonymous donors");
        match self
            .request_list("/Users", donor_query(PUBLIC_LEVEL, None), None, LIST_KEY)
            .await
        {
            Ok(donors) => Ok(donors),
            Err(e) => {
                warn!("Public donors failed ({}), trying /api/Users", e);
                self.request_list("/api/Users", donor_query(PUBLIC_LEVEL, None), None, LIST_KEY)
                    .await
            }
        }
    }

    /// Every non-anonymous donor, including those hidden from the public portal
    pub async fn all_donors(&self, token: &str) -> Result<Vec<UserDto>, ApiError> {
        info!("Fetching all non-anonymous donors");
        self.request_list(
            "/Users",
            donor_query(AUTHENTICATED_DONOR_LEVEL, Some(token)),
            Some(token),
            LIST_KEY,
        )
        .await
    }

    pub async fn donors_by_blood_group(
        &self,
        group: BloodGroup,
        token: Option<&str>,
    ) -> Result<Vec<UserDto>, ApiError> {
        let options = donor_query(PUBLIC_LEVEL, token).with_query("donorBloodGroup", group.code());
        self.request_list("/Users", options, token, LIST_KEY).await
    }

    pub async fn search_donors(&self, term: &str, token: Option<&str>) -> Result<Vec<UserDto>, ApiError> {
        let options = donor_query(PUBLIC_LEVEL, token).with_query("search", term);
        self.request_list("/Users", options, token, LIST_KEY).await
    }
}
