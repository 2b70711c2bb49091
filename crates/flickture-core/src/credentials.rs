//! Persisted session credentials.
//!
//! A single bearer token plus an "is authenticated" flag. The request client
//! reads the token on every outgoing attempt and clears both on a 401; the
//! login, registration and logout flows write them.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Storage seam for the session token.
///
/// Implementations hold their state behind a lock so that a read racing a
/// clear on a multi-threaded runtime always sees either the old token or none.
pub trait CredentialStore: Send + Sync {
    /// The stored token, or `None` when absent or empty.
    fn token(&self) -> Option<String>;

    /// Store a token and mark the session authenticated. An empty token clears.
    fn set_token(&self, token: &str) -> Result<(), CoreError>;

    fn is_authenticated(&self) -> bool;

    /// Remove the token and the authenticated flag.
    fn clear(&self) -> Result<(), CoreError>;
}

/// On-disk shape of the credential file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: Option<String>,
    #[serde(default)]
    pub authenticated: bool,
}

impl Credentials {
    fn with_token(token: &str) -> Self {
        if token.is_empty() {
            Self::default()
        } else {
            Self {
                token: Some(token.to_string()),
                authenticated: true,
            }
        }
    }

    fn usable_token(&self) -> Option<String> {
        self.token.clone().filter(|t| !t.is_empty())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: RwLock<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            state: RwLock::new(Credentials::with_token(token)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .usable_token()
    }

    fn set_token(&self, token: &str) -> Result<(), CoreError> {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Credentials::with_token(token);
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .authenticated
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Credentials::default();
        Ok(())
    }
}

/// JSON file store that survives restarts. Every change is written through.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    state: RwLock<Credentials>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading existing credentials if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Credentials::default()
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, creds: &Credentials) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(creds)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .usable_token()
    }

    fn set_token(&self, token: &str) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let next = Credentials::with_token(token);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .authenticated
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = Credentials::default();
        // The in-memory state is cleared even if the write fails.
        self.persist(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_and_clear() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());

        store.set_token("abc123").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc123"));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let store = MemoryCredentialStore::with_token("");
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());

        store.set_token("x").unwrap();
        store.set_token("").unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        assert_eq!(store.token(), None);
        store.set_token("persisted").unwrap();
        drop(store);

        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("persisted"));
        assert!(reopened.is_authenticated());
    }

    #[test]
    fn test_file_store_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        store.set_token("t").unwrap();
        store.clear().unwrap();

        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.token(), None);
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileCredentialStore::open(&path),
            Err(CoreError::Credentials(_))
        ));
    }
}
