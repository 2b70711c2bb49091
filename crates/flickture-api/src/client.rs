use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use flickture_core::config::ApiConfig;
use flickture_core::credentials::{CredentialStore, MemoryCredentialStore};
use flickture_core::navigation::{Navigator, SessionExpiry};
use flickture_core::notify::{Notifier, ToastQueue};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{
    Authorize, Deduplicate, Middleware, Next, PendingRequests, Retry, RetryPolicy, SurfaceErrors,
};
use crate::request::ApiRequest;
use crate::transport::{HttpTransport, Transport};

/// Single entry point for every call to the remote API.
///
/// Build one per process and hand out clones; clones share the pipeline,
/// the pending-request registry and the credential store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    stages: Arc<[Arc<dyn Middleware>]>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
    pending: PendingRequests,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Send a request through the full pipeline.
    pub async fn send(&self, request: ApiRequest) -> ApiResult {
        Next::new(
            self.inner.stages.clone(),
            self.inner.transport.clone(),
            self.inner.timeout,
        )
        .run(request)
        .await
    }

    /// Send and decode the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(ApiRequest::get(path).query(query)?).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    /// POST without a body, for toggle-style endpoints.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::post(path)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(ApiRequest::patch(path).json(body)?).await
    }

    /// DELETE, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.credentials
    }

    /// Number of logical requests currently in flight.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    auth_scheme: String,
    login_path: String,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    extra: Vec<Arc<dyn Middleware>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClientBuilder {
    /// Start from the built-in default configuration.
    pub fn new() -> Self {
        Self::from_config(&flickture_core::config::AppConfig::default().api)
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: config.retry_base_delay(),
            },
            auth_scheme: config.auth_scheme.clone(),
            login_path: config.login_path.clone(),
            transport: None,
            credentials: None,
            notifier: None,
            navigator: None,
            extra: Vec::new(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.retry.max_retries = retries;
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry.base_delay = delay;
        self
    }

    pub fn auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Replace the HTTP transport. `base_url` is ignored when set.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Add a stage after token injection, right before the network call.
    pub fn layer(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.extra.push(stage);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.base_url)?),
        };
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(ToastQueue::default()));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(SessionExpiry::new()));

        let pending = PendingRequests::new();
        let mut stages: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Deduplicate::new(pending.clone())),
            Arc::new(SurfaceErrors::new(
                notifier,
                navigator,
                credentials.clone(),
                self.login_path,
            )),
            Arc::new(Retry::new(self.retry)),
            Arc::new(Authorize::new(credentials.clone(), self.auth_scheme)),
        ];
        stages.extend(self.extra);

        tracing::debug!(
            base_url = %self.base_url,
            timeout_ms = self.timeout.as_millis() as u64,
            max_retries = self.retry.max_retries,
            "API client ready"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                stages: stages.into(),
                transport,
                timeout: self.timeout,
                pending,
                credentials,
            }),
        })
    }
}
