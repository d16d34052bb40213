use super::client::{ApiClient, RequestOptions};
use super::types::{CommuneDto, WilayaDto};
use crate::utils::ApiError;

impl ApiClient {
    pub async fn wilayas(&self) -> Result<Vec<WilayaDto>, ApiError> {
        self.request_list("/Wilayas", RequestOptions::get(), None, "wilayas")
            .await
    }

    pub async fn communes(&self) -> Result<Vec<CommuneDto>, ApiError> {
        self.request_list("/Communes", RequestOptions::get(), None, "communes")
            .await
    }
}
