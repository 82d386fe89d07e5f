//! Authenticated request gateway
//!
//! Every call goes through [`AuthGateway::send`]:
//!
//! 1. send with `Authorization: Bearer <access>` when a session exists;
//! 2. anything but a 401 on a bearer request is final;
//! 3. on the first 401, refresh the access token through the refresh gate;
//! 4. resend once with the refreshed token, and return whatever comes back.
//!
//! A failed refresh clears the session, fires the session-expired hook and
//! returns [`ClientError::SessionExpired`] carrying the refresh error.

use crate::client::error::{ClientError, extract_message};
use crate::request::{ApiRequest, Attempt, AuthMode};
use crate::session::SessionStore;
use crate::types::{ApiResponse, RefreshResponse};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub const REFRESH_PATH: &str = "/auth/refresh";

/// Called after a failed refresh has discarded the session
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct AuthGateway {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    refresh_gate: Arc<Mutex<()>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl AuthGateway {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        on_session_expired: Option<SessionExpiredHook>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            store,
            refresh_gate: Arc::new(Mutex::new(())),
            on_session_expired,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, recovering from one expired access token
    #[instrument(skip_all, fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let token = match request.auth() {
            AuthMode::Bearer => self.store.access_token(),
            AuthMode::Public => None,
        };

        let response = self.dispatch(request, token.as_deref(), Attempt::First).await?;
        if !needs_refresh(request, &response, Attempt::First) {
            return check_status(response).await;
        }

        let fresh = self.refresh_after(token.as_deref()).await?;
        let response = self.dispatch(request, Some(&fresh), Attempt::Retry).await?;
        check_status(response).await
    }

    /// Send once with the current token; a 401 is returned as-is
    pub async fn send_once(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let token = match request.auth() {
            AuthMode::Bearer => self.store.access_token(),
            AuthMode::Public => None,
        };
        let response = self.dispatch(request, token.as_deref(), Attempt::First).await?;
        check_status(response).await
    }

    /// Send and unwrap the `data` member of the success envelope
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        decode_envelope(response).await
    }

    /// Send and discard the response body
    pub async fn execute_empty(&self, request: &ApiRequest) -> Result<(), ClientError> {
        self.send(request).await?;
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// Does not clear the session on failure; that policy belongs to
    /// [`Self::send`].
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;
        self.request_refresh().await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<Response, ClientError> {
        let mut builder = self
            .http
            .request(request.method().clone(), self.url(request.path()));

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        debug!(
            attempt = attempt.as_str(),
            authenticated = token.is_some(),
            status = response.status().as_u16(),
            "Request completed"
        );
        Ok(response)
    }

    /// Obtain the access token to retry with after a 401
    ///
    /// `stale` is the token the failed attempt carried. When the stored token
    /// differs, a concurrent request already refreshed while this one waited
    /// on the gate, and its token is reused. When the session is gone, a
    /// concurrent refresh failed and already discarded it; the expiry is
    /// reported without refreshing, clearing or firing the hook again.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        match self.store.access_token() {
            Some(current) if stale != Some(current.as_str()) => {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
            None if stale.is_some() => {
                debug!("Session discarded by a concurrent request");
                return Err(ClientError::session_expired(
                    ClientError::MissingRefreshToken,
                ));
            }
            _ => {}
        }

        match self.request_refresh().await {
            Ok(token) => Ok(token),
            Err(error) => {
                warn!(error = %error, "Token refresh failed, discarding session");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear session");
                }
                if let Some(hook) = &self.on_session_expired {
                    hook();
                }
                Err(ClientError::session_expired(error))
            }
        }
    }

    async fn request_refresh(&self) -> Result<String, ClientError> {
        let session = self.store.get().ok_or(ClientError::MissingRefreshToken)?;

        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .bearer_auth(&session.refresh_token)
            .send()
            .await?;
        let response = check_status(response).await?;
        let refreshed: RefreshResponse = decode_envelope(response).await?;

        self.store
            .set(session.with_access_token(refreshed.access_token.clone()))?;
        info!("Access token refreshed");

        Ok(refreshed.access_token)
    }
}

fn needs_refresh(request: &ApiRequest, response: &Response, attempt: Attempt) -> bool {
    response.status() == StatusCode::UNAUTHORIZED
        && request.auth() == AuthMode::Bearer
        && attempt.can_refresh()
}

/// Turn a non-2xx response into a typed error
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status, extract_message(status, &body)))
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    let envelope: ApiResponse<T> = serde_json::from_str(&body)?;

    if !envelope.success {
        return Err(ClientError::ServerError {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string()),
        });
    }

    Ok(envelope.data)
}
