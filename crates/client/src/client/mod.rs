//! Pledge HTTP client
//!
//! Wraps every outgoing call to the backend: attaches the stored access
//! credential as a bearer token, and on a 401 performs exactly one silent
//! renewal against the refresh endpoint before replaying the original
//! request. Any other failure passes through unchanged.

pub mod auth;
pub mod campaigns;
pub mod donations;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, ClientBuilder, Request, StatusCode, header};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    session::{MemorySessionStore, SessionStore},
    types::{RefreshRequest, RefreshResponse},
};

/// Default backend origin
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Renewal endpoint: exchanges a refresh credential for a new access credential
pub const REFRESH_PATH: &str = "/api/auth/jwt/refresh/";

/// Callback fired when the session cannot be renewed and the user has to
/// log in again. The CLI prints a notice; an embedding UI would navigate
/// to its login entry point.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Pledge API client
#[derive(Clone)]
pub struct PledgeClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    /// Serializes renewal attempts so concurrent 401s produce one renewal call
    renewal_gate: Arc<Mutex<()>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl PledgeClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PledgeClientBuilder {
        PledgeClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder, attaching the access credential when a
    /// session is stored
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(tokens) = self.session.get() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", tokens.access));
        }

        request
    }

    /// Execute a request and deserialize the JSON response body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// Execute a request that returns no body (e.g. DELETE)
    pub async fn execute_empty(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), ClientError> {
        let response = self.dispatch(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// Send a request, renewing the access credential once on a 401 and
    /// replaying the original request with the renewed credential.
    ///
    /// The replay copy is captured before transmission and re-issued at most
    /// once, so a 401 on the replayed request is returned to the caller
    /// unchanged rather than triggering a second renewal.
    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let request = request.build()?;
        let replay = request.try_clone();
        let sent_access = self.session.get().map(|tokens| tokens.access);

        let response = self.client.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // Requests with a streaming body cannot be replayed; surface the 401
        let Some(replay) = replay else {
            return Ok(response);
        };

        let access = self.renew_access(sent_access).await?;
        self.replay_with(replay, &access).await
    }

    async fn replay_with(
        &self,
        mut request: Request,
        access: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let value = header::HeaderValue::from_str(&format!("Bearer {access}")).map_err(|_| {
            ClientError::Configuration("renewed access credential is not a valid header value".into())
        })?;
        request.headers_mut().insert(header::AUTHORIZATION, value);

        debug!("replaying request with renewed access credential");
        Ok(self.client.execute(request).await?)
    }

    /// Exchange the stored refresh credential for a new access credential.
    ///
    /// `sent_access` is the credential the failed request went out with.
    /// Concurrent 401s serialize on the renewal gate; whoever enters second
    /// finds the store already rotated and skips its own renewal call.
    async fn renew_access(&self, sent_access: Option<String>) -> Result<String, ClientError> {
        let _guard = self.renewal_gate.lock().await;

        let Some(tokens) = self.session.get() else {
            return Err(self.session_expired("no refresh credential stored"));
        };

        if sent_access.as_deref() != Some(tokens.access.as_str()) {
            return Ok(tokens.access);
        }

        debug!("access credential rejected, renewing");
        let result = self
            .client
            .post(format!("{}{}", self.base_url, REFRESH_PATH))
            .json(&RefreshRequest {
                refresh: tokens.refresh,
            })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(self.session_expired(&format!("renewal request failed: {err}"))),
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(self.session_expired(&format!("renewal rejected with {status}: {message}")));
        }

        match response.json::<RefreshResponse>().await {
            Ok(renewed) => {
                self.session.set_access(renewed.access.clone());
                Ok(renewed.access)
            }
            Err(err) => Err(self.session_expired(&format!("malformed renewal response: {err}"))),
        }
    }

    /// Unrecoverable renewal failure: drop both credentials and signal the
    /// login entry point
    fn session_expired(&self, reason: &str) -> ClientError {
        warn!("session expired: {reason}");
        self.session.clear();
        if let Some(hook) = &self.on_session_expired {
            hook();
        }
        ClientError::SessionExpired(reason.to_string())
    }
}

/// Builder for PledgeClient
#[derive(Default)]
pub struct PledgeClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    session: Option<Arc<dyn SessionStore>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl PledgeClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Inject the session store (defaults to an in-memory store)
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Set a callback fired when the session cannot be renewed
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PledgeClient, ClientError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        url::Url::parse(&base_url)
            .map_err(|err| ClientError::Configuration(format!("invalid base_url: {err}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("pledge-client/0.1.0");
        }

        let client = client_builder.build()?;

        Ok(PledgeClient {
            client,
            base_url,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            renewal_gate: Arc::new(Mutex::new(())),
            on_session_expired: self.on_session_expired,
        })
    }
}
