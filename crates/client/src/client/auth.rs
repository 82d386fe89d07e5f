//! Authentication API client methods

use super::{ApiClient, ClientError};
use crate::request::ApiRequest;
use crate::session::Session;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, User, UserEnvelope};
use crate::validation::{
    ValidationError, validate_email, validate_password, validate_password_confirmation,
    validate_required, validate_username,
};
use tracing::{debug, info, warn};

impl RegisterRequest {
    /// Check the form before submission
    ///
    /// The password confirmation is checked first so that a mismatch is
    /// reported even when other fields are also off.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        validate_password_confirmation(&self.password, &self.password_confirm)?;
        let username = validate_username(&self.username)?;
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;

        Ok(Self {
            username,
            email,
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        })
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("username", &self.username)?;
        validate_required("password", &self.password)
    }
}

impl ApiClient {
    /// Create an account and store the issued session
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ClientError> {
        let request = request.validate()?;
        let req = ApiRequest::post("/auth/register")
            .public()
            .json(serde_json::to_value(&request)?);

        let auth: AuthResponse = self.gateway.execute(&req).await?;
        self.store_session(&auth)?;
        info!(user_id = auth.user.id, "Registered");
        Ok(auth)
    }

    /// Log in and store the issued session
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        request.validate()?;
        let req = ApiRequest::post("/auth/login")
            .public()
            .json(serde_json::to_value(&request)?);

        let auth: AuthResponse = self.gateway.execute(&req).await?;
        self.store_session(&auth)?;
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth)
    }

    /// Tell the server (best effort) and forget the session
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.is_authenticated() {
            let req = ApiRequest::post("/auth/logout");
            if let Err(e) = self.gateway.send_once(&req).await {
                debug!(error = %e, "Server-side logout failed");
            }
        }

        self.session_store().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Exchange the refresh token for a new access token and store it
    pub async fn refresh(&self) -> Result<String, ClientError> {
        self.gateway.refresh().await
    }

    /// Get the current user's profile
    pub async fn me(&self) -> Result<User, ClientError> {
        let req = ApiRequest::get("/auth/me");
        let envelope: UserEnvelope = self.gateway.execute(&req).await?;
        Ok(envelope.user)
    }

    /// Re-establish the user from a stored session
    ///
    /// Returns `None` when no session is stored. Any failure to load the
    /// profile discards the stored session and also yields `None`.
    pub async fn restore_session(&self) -> Result<Option<User>, ClientError> {
        if !self.is_authenticated() {
            return Ok(None);
        }

        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Stored session is unusable, discarding it");
                self.session_store().clear()?;
                Ok(None)
            }
        }
    }

    fn store_session(&self, auth: &AuthResponse) -> Result<(), ClientError> {
        self.session_store()
            .set(Session::new(&auth.access_token, &auth.refresh_token))?;
        Ok(())
    }
}
