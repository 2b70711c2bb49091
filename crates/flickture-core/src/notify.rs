//! Transient user-facing notifications.
//!
//! The request client raises one notification per surfaced failure through
//! the [`Notifier`] seam. [`ToastQueue`] is the stock implementation: a
//! list of toasts that auto-dismiss after a fixed delay or on demand.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default auto-dismiss delay.
pub const AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Kind of toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A single toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

/// Anything that can show a short message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

#[derive(Debug)]
struct Entry {
    toast: Notification,
    shown_at: Instant,
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Queue of visible toasts, oldest first.
#[derive(Debug)]
pub struct ToastQueue {
    auto_dismiss: Duration,
    state: Mutex<QueueState>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(AUTO_DISMISS)
    }
}

impl ToastQueue {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            auto_dismiss,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Push a toast stamped with `now`. Returns its id.
    pub fn push_at(&self, kind: NotificationKind, message: &str, now: Instant) -> u64 {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.next_id += 1;
        let id = state.next_id;
        state.entries.push(Entry {
            toast: Notification {
                id,
                message: message.to_string(),
                kind,
            },
            shown_at: now,
        });
        id
    }

    /// Manually dismiss a toast. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let before = state.entries.len();
        state.entries.retain(|e| e.toast.id != id);
        state.entries.len() != before
    }

    /// Drop every toast older than the auto-dismiss delay as of `now`.
    pub fn expire(&self, now: Instant) {
        let auto_dismiss = self.auto_dismiss;
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .retain(|e| now.saturating_duration_since(e.shown_at) < auto_dismiss);
    }

    /// Currently visible toasts.
    pub fn visible(&self) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .iter()
            .map(|e| e.toast.clone())
            .collect()
    }

    /// Remove and return every visible toast.
    pub fn drain(&self) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .drain(..)
            .map(|e| e.toast)
            .collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.push_at(kind, message, Instant::now());
    }
}
