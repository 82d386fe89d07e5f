//! ForeignEye API client
//!
//! Typed access to the ForeignEye article/concept API. Tokens live in an
//! injectable [`SessionStore`]; every authenticated call goes through the
//! [`AuthGateway`], which recovers from an expired access token with at most
//! one refresh-and-retry cycle.

pub mod client;
pub mod gateway;
pub mod pagination;
pub mod request;
pub mod session;
pub mod types;
pub mod validation;

pub use client::{ApiClient, ApiClientBuilder, config::ClientConfig, error::ClientError};
pub use gateway::{AuthGateway, SessionExpiredHook};
pub use request::{ApiRequest, Attempt, AuthMode};
#[cfg(target_arch = "wasm32")]
pub use session::BrowserSessionStore;
#[cfg(not(target_arch = "wasm32"))]
pub use session::FileSessionStore;
pub use session::{MemorySessionStore, Session, SessionStore, StoreError};
pub use validation::ValidationError;
