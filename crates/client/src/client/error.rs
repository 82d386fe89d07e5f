//! Client error types

use crate::session::StoreError;
use crate::validation::ValidationError;
use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Duplicate resource (username taken, concept already collected)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Too many requests
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Token refresh failed; the stored session has been discarded
    #[error("Session expired: {source}")]
    SessionExpired {
        #[source]
        source: Box<ClientError>,
    },

    /// A refresh was needed but no refresh token is stored
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// Input rejected before any request was sent
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Session storage failure
    #[error("Session storage failed: {0}")]
    Storage(#[from] StoreError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            429 => Self::RateLimited(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Wrap a refresh failure
    pub(crate) fn session_expired(source: Self) -> Self {
        Self::SessionExpired {
            source: Box::new(source),
        }
    }

    /// HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status().map(|status| status.as_u16()),
            Self::ServerError { status, .. } => Some(*status),
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Whether the user has to log in again
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Message supplied by the server, if the error carries one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerError { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::Conflict(message)
            | Self::RateLimited(message) => Some(message),
            Self::SessionExpired { source } => source.server_message(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
    msg: Option<String>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pull a human-readable message out of an error response body
///
/// Understands the API's `{ "error": { "message": .. } }` envelope, a
/// top-level `message`, and the token middleware's `{ "msg": .. }`. Falls
/// back to the raw body, then to the status reason.
pub(crate) fn extract_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let message = parsed
            .error
            .and_then(|detail| detail.message)
            .or(parsed.message)
            .or(parsed.msg);
        if let Some(message) = message {
            return message;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}
