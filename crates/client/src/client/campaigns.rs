//! Campaign API client methods

use reqwest::Method;

use super::PledgeClient;
use crate::{
    error::ClientError,
    types::{Campaign, NewCampaign},
};

impl PledgeClient {
    /// List all campaigns (public endpoint)
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        let request = self.request(Method::GET, "/api/campaigns/");
        self.execute(request).await
    }

    /// Fetch a single campaign by id
    pub async fn get_campaign(&self, id: i64) -> Result<Campaign, ClientError> {
        let request = self.request(Method::GET, &format!("/api/campaigns/{id}/"));
        self.execute(request).await
    }

    /// List campaigns owned by the logged-in user (requires authentication)
    pub async fn my_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        let request = self.request(Method::GET, "/api/campaigns/mine/");
        self.execute(request).await
    }

    /// Create a campaign owned by the logged-in user (requires authentication)
    pub async fn create_campaign(&self, campaign: NewCampaign) -> Result<Campaign, ClientError> {
        let request = self
            .request(Method::POST, "/api/campaigns/")
            .json(&campaign);
        self.execute(request).await
    }

    /// Replace a campaign's fields (owner only)
    pub async fn update_campaign(
        &self,
        id: i64,
        campaign: NewCampaign,
    ) -> Result<Campaign, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/campaigns/{id}/"))
            .json(&campaign);
        self.execute(request).await
    }

    /// Delete a campaign (owner only)
    pub async fn delete_campaign(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/campaigns/{id}/"));
        self.execute_empty(request).await
    }
}
