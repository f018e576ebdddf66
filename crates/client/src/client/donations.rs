//! Donation API client methods

use reqwest::Method;

use super::PledgeClient;
use crate::{
    error::ClientError,
    types::{Donation, NewDonation},
};

impl PledgeClient {
    /// Donate to a campaign (requires authentication)
    pub async fn donate(&self, donation: NewDonation) -> Result<Donation, ClientError> {
        let request = self
            .request(Method::POST, "/api/donations/")
            .json(&donation);
        self.execute(request).await
    }
}
