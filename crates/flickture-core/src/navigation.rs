//! Forced navigation to the login entry point.
//!
//! A 401 from any endpoint throws the whole session away. In a browser that
//! is a full-document load of the login page; other front ends decide what
//! "go to login" means by implementing [`Navigator`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub trait Navigator: Send + Sync {
    /// Discard in-memory session state and send the user to `login_path`.
    fn redirect_to_login(&self, login_path: &str);
}

/// Navigator that remembers a forced logout so the front end can act on it
/// once the current operation returns.
#[derive(Debug, Default)]
pub struct SessionExpiry {
    expired: AtomicBool,
    login_path: Mutex<Option<String>>,
}

impl SessionExpiry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    /// Path passed to the most recent redirect.
    pub fn login_path(&self) -> Option<String> {
        self.login_path
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Clear the expired flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.expired.swap(false, Ordering::SeqCst)
    }
}

impl Navigator for SessionExpiry {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::warn!(login_path, "Session rejected, redirecting to login");
        *self.login_path.lock().unwrap_or_else(|e| e.into_inner()) = Some(login_path.to_string());
        self.expired.store(true, Ordering::SeqCst);
    }
}
