//! Session Context
//!
//! Holds the access/refresh token pair behind an injectable [`TokenStore`].
//! The presence of an access token is the only thing that makes a session
//! "authenticated"; tokens are never validated or expired client-side.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::model::AuthTokens;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key/value persistence for session tokens
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Errors raised by token stores
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("token storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write token storage: {0}")]
    Write(String),

    #[error("token storage is corrupt: {0}")]
    Corrupt(String),
}

/// Process-local store; nothing survives a restart
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

/// Snapshot of the persisted tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Explicit session handle shared by the API client and the shell
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh [`MemoryTokenStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn current(&self) -> Option<Session> {
        self.access_token().map(|access_token| Session {
            access_token,
            refresh_token: self.refresh_token(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist a freshly issued token pair
    pub fn save(&self, tokens: &AuthTokens) -> Result<(), SessionError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        tracing::info!("Session tokens stored");
        Ok(())
    }

    /// Forget both tokens. The server is not told.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        tracing::info!("Session tokens cleared");
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(feature = "native")]
pub use file_store::FileTokenStore;

#[cfg(feature = "native")]
mod file_store {
    use super::{SessionError, TokenStore};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Tokens kept in a small JSON file, the native stand-in for browser
    /// localStorage
    pub struct FileTokenStore {
        path: PathBuf,
        // Serializes read-modify-write cycles within this process
        lock: Mutex<()>,
    }

    impl FileTokenStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                lock: Mutex::new(()),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => serde_json::from_str(&content)
                    .map_err(|e| SessionError::Corrupt(format!("{:?}: {}", self.path, e))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(SessionError::Unavailable(format!("{:?}: {}", self.path, e))),
            }
        }

        fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
            if entries.is_empty() {
                return match std::fs::remove_file(&self.path) {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                        Err(SessionError::Write(e.to_string()))
                    }
                    _ => Ok(()),
                };
            }

            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SessionError::Write(e.to_string()))?;
            }
            let content = serde_json::to_string_pretty(entries)
                .map_err(|e| SessionError::Write(e.to_string()))?;
            std::fs::write(&self.path, content).map_err(|e| SessionError::Write(e.to_string()))
        }

        fn modify(
            &self,
            f: impl FnOnce(&mut BTreeMap<String, String>),
        ) -> Result<(), SessionError> {
            let _guard = self
                .lock
                .lock()
                .map_err(|e| SessionError::Unavailable(e.to_string()))?;
            let mut entries = self.read_entries()?;
            f(&mut entries);
            self.write_entries(&entries)
        }
    }

    impl TokenStore for FileTokenStore {
        fn get(&self, key: &str) -> Option<String> {
            match self.read_entries() {
                Ok(mut entries) => entries.remove(key),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session file: {}", e);
                    None
                }
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
            self.modify(|entries| {
                entries.insert(key.to_string(), value.to_string());
            })
        }

        fn remove(&self, key: &str) -> Result<(), SessionError> {
            self.modify(|entries| {
                entries.remove(key);
            })
        }
    }
}
