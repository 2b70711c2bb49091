use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;

use super::{Middleware, Next};
use crate::error::{ApiError, ApiResult, TransportError};
use crate::fingerprint::Fingerprint;
use crate::request::ApiRequest;

type InFlight = Shared<BoxFuture<'static, ApiResult>>;

/// Registry of in-flight requests keyed by fingerprint.
///
/// An entry lives from dispatch until the request settles, including any
/// retries. It is empty whenever the client is idle.
#[derive(Clone, Default)]
pub struct PendingRequests {
    inner: Arc<Mutex<HashMap<Fingerprint, InFlight>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(fingerprint)
    }

    fn remove(&self, fingerprint: &Fingerprint) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(fingerprint);
    }
}

/// Collapses identical concurrent requests into one network call.
///
/// The first caller for a fingerprint spawns the rest of the pipeline as its
/// own task; callers arriving while it is in flight await the same shared
/// result. The task runs to completion and removes its entry even when every
/// caller has gone away, so a request issued after settlement always goes to
/// the network again.
pub struct Deduplicate {
    pending: PendingRequests,
}

impl Deduplicate {
    pub fn new(pending: PendingRequests) -> Self {
        Self { pending }
    }
}

impl Middleware for Deduplicate {
    fn handle(&self, request: ApiRequest, next: Next) -> BoxFuture<'static, ApiResult> {
        let fingerprint = request.fingerprint();
        let mut map = self.pending.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = map.get(&fingerprint) {
            tracing::debug!(method = %request.method, path = %request.path, "Joining in-flight request");
            return existing.clone().boxed();
        }

        let registry = self.pending.clone();
        let key = fingerprint.clone();
        let task = tokio::spawn(async move {
            let result = next.run(request).await;
            registry.remove(&key);
            result
        });
        let shared = async move {
            task.await.unwrap_or_else(|e| {
                Err(ApiError::Transport(TransportError::other(format!(
                    "request task failed: {e}"
                ))))
            })
        }
        .boxed()
        .shared();

        map.insert(fingerprint, shared.clone());
        shared.boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::testing::{Outcome, ScriptedTransport};

    fn dedup(transport: Arc<ScriptedTransport>) -> (Next, PendingRequests) {
        let pending = PendingRequests::new();
        let stages: Vec<Arc<dyn Middleware>> = vec![Arc::new(Deduplicate::new(pending.clone()))];
        (
            Next::new(stages.into(), transport, Duration::from_secs(10)),
            pending,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_identical_requests_share_one_call() {
        let transport = ScriptedTransport::new(vec![Outcome::slow(200, r#"{"id": 42}"#)]);
        let (next, pending) = dedup(transport.clone());

        let a = next.clone().run(ApiRequest::get("/movies/42/detail"));
        let b = next.run(ApiRequest::get("/movies/42/detail"));
        assert_eq!(pending.len(), 1);

        let (a, b) = tokio::join!(a, b);
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(transport.calls(), 1);
        assert!(pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_followers_share_failure() {
        let transport = ScriptedTransport::new(vec![Outcome::Delayed {
            after: Duration::from_millis(50),
            status: 500,
            body: String::new(),
        }]);
        let pending = PendingRequests::new();
        let stages: Vec<Arc<dyn Middleware>> = vec![Arc::new(Deduplicate::new(pending.clone()))];
        let next = Next::new(stages.into(), transport.clone(), Duration::from_secs(10));

        let (a, b) = tokio::join!(
            next.clone().run(ApiRequest::get("/x")),
            next.run(ApiRequest::get("/x"))
        );
        assert_eq!(a.unwrap_err().status(), Some(500));
        assert_eq!(b.unwrap_err().status(), Some(500));
        assert_eq!(transport.calls(), 1);
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_settled_request_is_reissued() {
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        let (next, pending) = dedup(transport.clone());

        next.clone().run(ApiRequest::get("/genres/")).await.unwrap();
        assert!(pending.is_empty());
        next.run(ApiRequest::get("/genres/")).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_still_settles() {
        let transport = ScriptedTransport::new(vec![Outcome::slow(5_000, "{}")]);
        let (next, pending) = dedup(transport.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(100),
            next.clone().run(ApiRequest::get("/genres/")),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(pending.len(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(pending.is_empty());
        assert_eq!(transport.calls(), 1);

        next.run(ApiRequest::get("/genres/")).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follower_survives_dropped_leader() {
        let transport = ScriptedTransport::new(vec![Outcome::slow(500, r#"{"id": 1}"#)]);
        let (next, _) = dedup(transport.clone());

        let leader = next.clone().run(ApiRequest::get("/lists/1"));
        let follower = next.run(ApiRequest::get("/lists/1"));
        drop(leader);

        let resp = follower.await.unwrap();
        assert_eq!(resp.body, r#"{"id": 1}"#);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_bodies_not_merged() {
        let transport = ScriptedTransport::new(vec![Outcome::slow(10, "{}")]);
        let (next, _) = dedup(transport.clone());

        let a = ApiRequest::post("/favorites/").json(&json!({"tmdb_id": 1})).unwrap();
        let b = ApiRequest::post("/favorites/").json(&json!({"tmdb_id": 2})).unwrap();
        let (ra, rb) = tokio::join!(next.clone().run(a), next.run(b));
        ra.unwrap();
        rb.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reordered_keys_are_merged() {
        let transport = ScriptedTransport::new(vec![Outcome::slow(10, "{}")]);
        let (next, _) = dedup(transport.clone());

        let a = ApiRequest::post("/watchlist/")
            .json(&json!({"tmdb_id": 7, "status": "watched"}))
            .unwrap();
        let b = ApiRequest::post("/watchlist/")
            .json(&json!({"status": "watched", "tmdb_id": 7}))
            .unwrap();
        let (ra, rb) = tokio::join!(next.clone().run(a), next.run(b));
        ra.unwrap();
        rb.unwrap();
        assert_eq!(transport.calls(), 1);
    }
}
