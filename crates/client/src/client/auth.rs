//! Authentication API client methods

use super::PledgeClient;
use crate::{
    error::ClientError,
    types::{Credentials, RegisterRequest, RegisterResponse, TokenPair},
};

/// Login endpoint: exchanges username and password for a credential pair
pub const LOGIN_PATH: &str = "/auth/jwt/create/";

/// Registration endpoint
pub const REGISTER_PATH: &str = "/register/";

impl PledgeClient {
    /// Register a new user account (public endpoint)
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        let req = self
            .request(reqwest::Method::POST, REGISTER_PATH)
            .json(&request);
        self.execute(req).await
    }

    /// Log in and store the returned credential pair
    ///
    /// Subsequent requests carry the access credential until it expires or
    /// [`logout`](Self::logout) is called.
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair, ClientError> {
        let req = self
            .request(reqwest::Method::POST, LOGIN_PATH)
            .json(&credentials);
        let tokens: TokenPair = self.execute(req).await?;
        self.session.set(tokens.clone());
        Ok(tokens)
    }

    /// Drop the stored session (client-side only)
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Whether a credential pair is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.session.get().is_some()
    }
}
