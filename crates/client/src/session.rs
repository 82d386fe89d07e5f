//! Session persistence
//!
//! A session is the access/refresh token pair issued at login. Stores are
//! injected into the client so that tests and embedders can swap the medium;
//! writes are last-write-wins and tokens are never inspected.

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Bearer token pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Same session with the access token replaced
    #[must_use]
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Session storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session could not be encoded
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// Browser storage rejected the operation
    #[error("Browser storage error: {0}")]
    Browser(String),
}

/// Persistent home of the current session
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Current session, if both tokens are present
    fn get(&self) -> Option<Session>;

    /// Replace the stored session
    fn set(&self, session: Session) -> Result<(), StoreError>;

    /// Forget the stored session
    fn clear(&self) -> Result<(), StoreError>;

    fn access_token(&self) -> Option<String> {
        self.get().map(|session| session.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get().map(|session| session.refresh_token)
    }
}

/// Process-local store, lost on exit
#[derive(Default)]
pub struct MemorySessionStore {
    current: ArcSwapOption<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.current.load_full().map(|session| (*session).clone())
    }

    fn set(&self, session: Session) -> Result<(), StoreError> {
        self.current.store(Some(Arc::new(session)));
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.current.store(None);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSessionStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{Session, SessionStore, StoreError};
    use std::fs::OpenOptions;
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// JSON file holding both tokens
    #[derive(Debug, Clone)]
    pub struct FileSessionStore {
        path: PathBuf,
    }

    impl FileSessionStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn io_error(&self, source: std::io::Error) -> StoreError {
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        }
    }

    impl SessionStore for FileSessionStore {
        fn get(&self) -> Option<Session> {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => return None,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                    return None;
                }
            };

            match serde_json::from_str(&content) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                    None
                }
            }
        }

        fn set(&self, session: Session) -> Result<(), StoreError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }

            let content = serde_json::to_string_pretty(&session)?;

            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            // Tokens are credentials
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

            // A file created earlier with wider permissions is narrowed before writing
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.set_permissions(std::fs::Permissions::from_mode(0o600))
                    .map_err(|e| self.io_error(e))?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| self.io_error(e))?;

            debug!(path = %self.path.display(), "Session saved");
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {
                    debug!(path = %self.path.display(), "Session removed");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, Session, SessionStore, StoreError};
    use web_sys::Storage;

    /// `localStorage`-backed store using the plain `access_token` /
    /// `refresh_token` keys
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserSessionStore;

    fn local_storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StoreError::Browser("localStorage is unavailable".to_string()))
    }

    fn browser_error(e: wasm_bindgen::JsValue) -> StoreError {
        StoreError::Browser(format!("{e:?}"))
    }

    impl SessionStore for BrowserSessionStore {
        fn get(&self) -> Option<Session> {
            let storage = local_storage().ok()?;
            let access_token = storage.get_item(ACCESS_TOKEN_KEY).ok().flatten()?;
            let refresh_token = storage.get_item(REFRESH_TOKEN_KEY).ok().flatten()?;
            Some(Session {
                access_token,
                refresh_token,
            })
        }

        fn set(&self, session: Session) -> Result<(), StoreError> {
            let storage = local_storage()?;
            storage
                .set_item(ACCESS_TOKEN_KEY, &session.access_token)
                .map_err(browser_error)?;
            storage
                .set_item(REFRESH_TOKEN_KEY, &session.refresh_token)
                .map_err(browser_error)
        }

        fn clear(&self) -> Result<(), StoreError> {
            let storage = local_storage()?;
            storage.remove_item(ACCESS_TOKEN_KEY).map_err(browser_error)?;
            storage.remove_item(REFRESH_TOKEN_KEY).map_err(browser_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());

        store.set(Session::new("a1", "r1")).unwrap();
        store.set(Session::new("a2", "r1")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_with_access_token_keeps_refresh_token() {
        let session = Session::new("old", "refresh").with_access_token("new");
        assert_eq!(session, Session::new("new", "refresh"));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let rendered = format!("{:?}", Session::new("secret-access", "secret-refresh"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_session_uses_storage_keys() {
        let value = serde_json::to_value(Session::new("a", "r")).unwrap();
        assert_eq!(value[ACCESS_TOKEN_KEY], "a");
        assert_eq!(value[REFRESH_TOKEN_KEY], "r");
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod file_store {
        use super::super::*;
        use tempfile::TempDir;

        #[test]
        fn test_round_trip_and_clear() {
            let temp_dir = TempDir::new().unwrap();
            let store = FileSessionStore::new(temp_dir.path().join("nested").join("session.json"));

            assert!(store.get().is_none());
            store.set(Session::new("access", "refresh")).unwrap();
            assert_eq!(store.get(), Some(Session::new("access", "refresh")));

            store.clear().unwrap();
            assert!(store.get().is_none());
            assert!(!store.path().exists());
        }

        #[cfg(unix)]
        #[test]
        fn test_session_file_is_owner_only() {
            use std::os::unix::fs::PermissionsExt;

            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("session.json");
            std::fs::write(&path, "{}").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

            let store = FileSessionStore::new(&path);
            store.set(Session::new("access", "refresh")).unwrap();
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);

            std::fs::remove_file(&path).unwrap();
            store.set(Session::new("access", "refresh")).unwrap();
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
            assert_eq!(store.get(), Some(Session::new("access", "refresh")));
        }

        #[test]
        fn test_clear_without_file_is_ok() {
            let temp_dir = TempDir::new().unwrap();
            let store = FileSessionStore::new(temp_dir.path().join("session.json"));
            assert!(store.clear().is_ok());
        }

        #[test]
        fn test_corrupt_file_reads_as_no_session() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("session.json");
            std::fs::write(&path, "{\"access_token\": \"only-one\"}").unwrap();

            let store = FileSessionStore::new(path);
            assert!(store.get().is_none());
        }
    }
}
