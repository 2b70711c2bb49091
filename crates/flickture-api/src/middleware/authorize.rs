use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::header::{HeaderValue, AUTHORIZATION};

use flickture_core::credentials::CredentialStore;

use super::{Middleware, Next};
use crate::error::ApiResult;
use crate::request::ApiRequest;

/// Attaches `Authorization: <scheme> <token>` from the credential store.
///
/// Runs once per attempt, so a retry picks up a token that changed in
/// between. Without a stored token the header is left off entirely.
pub struct Authorize {
    credentials: Arc<dyn CredentialStore>,
    scheme: String,
}

impl Authorize {
    pub fn new(credentials: Arc<dyn CredentialStore>, scheme: impl Into<String>) -> Self {
        Self {
            credentials,
            scheme: scheme.into(),
        }
    }
}

impl Middleware for Authorize {
    fn handle(&self, mut request: ApiRequest, next: Next) -> BoxFuture<'static, ApiResult> {
        if let Some(token) = self.credentials.token() {
            match HeaderValue::from_str(&format!("{} {token}", self.scheme)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!(path = %request.path, "Stored token is not a valid header value, sending without it");
                }
            }
        }
        next.run(request)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{Outcome, ScriptedTransport};
    use flickture_core::credentials::MemoryCredentialStore;

    fn run_with(store: Arc<MemoryCredentialStore>, transport: Arc<ScriptedTransport>) -> Next {
        let stages: Vec<Arc<dyn Middleware>> = vec![Arc::new(Authorize::new(store, "Bearer"))];
        Next::new(stages.into(), transport, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_injects_bearer_token() {
        let store = Arc::new(MemoryCredentialStore::with_token("abc123"));
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        run_with(store, transport.clone())
            .run(ApiRequest::get("/auth/me"))
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].headers[AUTHORIZATION], "Bearer abc123");
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let store = Arc::new(MemoryCredentialStore::new());
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        run_with(store, transport.clone())
            .run(ApiRequest::get("/movies/discover"))
            .await
            .unwrap();

        assert!(transport.requests()[0].headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_invalid_token_is_not_sent() {
        let store = Arc::new(MemoryCredentialStore::with_token("bad\ntoken"));
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        run_with(store, transport.clone())
            .run(ApiRequest::get("/auth/me"))
            .await
            .unwrap();

        assert!(transport.requests()[0].headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_token_read_per_call() {
        let store = Arc::new(MemoryCredentialStore::new());
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        let next = run_with(store.clone(), transport.clone());

        next.clone().run(ApiRequest::get("/a")).await.unwrap();
        store.set_token("later").unwrap();
        next.run(ApiRequest::get("/b")).await.unwrap();

        let sent = transport.requests();
        assert!(sent[0].headers.get(AUTHORIZATION).is_none());
        assert_eq!(sent[1].headers[AUTHORIZATION], "Bearer later");
    }
}
