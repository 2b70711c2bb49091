//! Composable stages around the transport.
//!
//! A stage receives the request plus a [`Next`] handle for the rest of the
//! chain. It can pass through, call `next` several times (retry), or return
//! without calling it at all (joining a duplicate in-flight request).

pub mod authorize;
pub mod dedup;
pub mod retry;
pub mod surface;

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{ApiError, ApiResult, TransportError};
use crate::request::ApiRequest;
use crate::transport::Transport;

pub use authorize::Authorize;
pub use dedup::{Deduplicate, PendingRequests};
pub use retry::{Retry, RetryPolicy};
pub use surface::SurfaceErrors;

/// One stage of the request pipeline.
///
/// The returned future must be `'static`: stages clone what they need out of
/// `&self` before building it.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, request: ApiRequest, next: Next) -> BoxFuture<'static, ApiResult>;
}

/// The remainder of the pipeline after the current stage.
#[derive(Clone)]
pub struct Next {
    stages: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Next {
    pub fn new(
        stages: Arc<[Arc<dyn Middleware>]>,
        transport: Arc<dyn Transport>,
        timeout: Duration,
    ) -> Self {
        Self {
            stages,
            index: 0,
            transport,
            timeout,
        }
    }

    /// Run the next stage, or the transport once every stage has run.
    pub fn run(self, request: ApiRequest) -> BoxFuture<'static, ApiResult> {
        match self.stages.get(self.index).cloned() {
            Some(stage) => {
                let next = Next {
                    index: self.index + 1,
                    ..self
                };
                stage.handle(request, next)
            }
            None => dispatch(self.transport, request, self.timeout).boxed(),
        }
    }
}

/// One network attempt, bounded by the per-attempt timeout. Non-2xx
/// responses become [`ApiError::Status`].
async fn dispatch(transport: Arc<dyn Transport>, request: ApiRequest, timeout: Duration) -> ApiResult {
    let method = request.method.clone();
    let path = request.path.clone();
    tracing::debug!(%method, %path, "Sending request");

    let response = match tokio::time::timeout(timeout, transport.send(request)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(TransportError::timeout(format!(
                "no response within {}ms",
                timeout.as_millis()
            ))
            .into());
        }
    };

    if response.is_success() {
        tracing::debug!(%method, %path, status = response.status, "Request succeeded");
        Ok(response)
    } else {
        tracing::debug!(%method, %path, status = response.status, "Request returned error status");
        Err(ApiError::Status {
            status: response.status,
            body: response.body,
        })
    }
}
