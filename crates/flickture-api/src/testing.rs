//! In-memory fakes for pipeline tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::Instant;

use flickture_core::notify::{NotificationKind, Notifier};

use crate::error::{ApiError, ApiResult, TransportError};
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;

/// What the fake network does for one call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Respond { status: u16, body: String },
    Delayed { after: Duration, status: u16, body: String },
    Fail(TransportError),
    Hang,
}

impl Outcome {
    pub fn ok(body: &str) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.to_string(),
        }
    }

    pub fn slow(after_ms: u64, body: &str) -> Self {
        Self::Delayed {
            after: Duration::from_millis(after_ms),
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn connect_error() -> Self {
        Self::Fail(TransportError::connect("connection refused"))
    }
}

#[derive(Default)]
struct Script {
    outcomes: VecDeque<Outcome>,
    requests: Vec<ApiRequest>,
    sent_at: Vec<Instant>,
}

/// Replays queued outcomes in order. The last outcome repeats forever.
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                outcomes: outcomes.into(),
                ..Default::default()
            }),
        })
    }

    pub fn calls(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn sent_at(&self) -> Vec<Instant> {
        self.script.lock().unwrap().sent_at.clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult> {
        let outcome = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request);
            script.sent_at.push(Instant::now());
            if script.outcomes.len() > 1 {
                script.outcomes.pop_front()
            } else {
                script.outcomes.front().cloned()
            }
        };

        async move {
            match outcome {
                Some(Outcome::Respond { status, body }) => Ok(ApiResponse { status, body }),
                Some(Outcome::Delayed {
                    after,
                    status,
                    body,
                }) => {
                    tokio::time::sleep(after).await;
                    Ok(ApiResponse { status, body })
                }
                Some(Outcome::Fail(err)) => Err(ApiError::Transport(err)),
                Some(Outcome::Hang) => futures::future::pending().await,
                None => Err(ApiError::Transport(TransportError::other("script exhausted"))),
            }
        }
        .boxed()
    }
}

/// Notifier that keeps every message it was asked to show.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((kind, message.to_string()));
    }
}
