//! ForeignEye HTTP client

pub mod articles;
pub mod auth;
pub mod collections;
pub mod concepts;
pub mod config;
pub mod error;

use crate::gateway::{AuthGateway, SessionExpiredHook};
use crate::request::ApiRequest;
use crate::session::{MemorySessionStore, Session, SessionStore};
use config::ClientConfig;
use error::ClientError;
use reqwest::ClientBuilder;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("foreigneye-client/", env!("CARGO_PKG_VERSION"));

/// ForeignEye API client
#[derive(Clone)]
pub struct ApiClient {
    gateway: AuthGateway,
}

impl ApiClient {
    /// Create a new client with an in-memory session
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.gateway.base_url()
    }

    /// The gateway all requests go through
    pub const fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        self.gateway.store()
    }

    /// Currently stored session
    pub fn session(&self) -> Option<Session> {
        self.gateway.store().get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Execute an arbitrary request and unwrap its `data` payload
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        self.gateway.execute(request).await
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    session_store: Option<Arc<dyn SessionStore>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiClientBuilder {
    /// Start from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::default().base_url(config.base_url.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder
    }

    /// Set the versioned base URL, e.g. `http://localhost:5000/api/v1`
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (ignored on wasm32)
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Where tokens are kept; defaults to [`MemorySessionStore`]
    #[must_use]
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Called whenever a failed refresh discards the session
    #[must_use]
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        // Browsers own both of these
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
            client_builder = client_builder.user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            );
        }

        let http = client_builder.build()?;
        let store = self
            .session_store
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        Ok(ApiClient {
            gateway: AuthGateway::new(http, base_url, store, self.on_session_expired),
        })
    }
}
