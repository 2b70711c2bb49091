use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::{Middleware, Next};
use crate::error::ApiResult;
use crate::request::ApiRequest;

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based): `base_delay * retry`,
    /// saturating instead of overflowing.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }
}

/// Re-issues a request after transient failures (no response received).
/// Received error responses are returned on the first attempt.
pub struct Retry {
    policy: RetryPolicy,
}

impl Retry {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }
}

impl Middleware for Retry {
    fn handle(&self, request: ApiRequest, next: Next) -> BoxFuture<'static, ApiResult> {
        let policy = self.policy;
        async move {
            let mut retries = 0;
            loop {
                match next.clone().run(request.clone()).await {
                    Err(err) if err.is_transient() && retries < policy.max_retries => {
                        retries += 1;
                        let delay = policy.delay_for(retries);
                        tracing::warn!(
                            method = %request.method,
                            path = %request.path,
                            attempt = retries,
                            max_retries = policy.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Transient failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    result => return result,
                }
            }
        }
        .boxed()
    }
}
