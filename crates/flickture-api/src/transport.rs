use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use reqwest::Client;
use url::Url;

use crate::error::{ApiError, ApiResult, TransportError};
use crate::request::{ApiRequest, ApiResponse};

/// The network call at the end of the middleware pipeline.
///
/// Returns every received response as `Ok`, whatever its status. Only a
/// failure to get a response at all is an error.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult>;
}

/// `reqwest`-backed transport rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    http: Client,
}

impl HttpTransport {
    /// Build a transport whose client sends JSON and disables intermediary caching.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .default_headers(default_headers())
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        async move {
            let url = request.url(&base_url)?;
            let mut builder = http
                .request(request.method.clone(), url)
                .headers(request.headers.clone());
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let resp = builder.send().await.map_err(|e| {
                if e.is_builder() {
                    ApiError::InvalidUrl(e.to_string())
                } else {
                    ApiError::Transport(TransportError::from(e))
                }
            })?;

            let status = resp.status().as_u16();
            // A connection dropped mid-body means no usable response either.
            let body = resp.text().await.map_err(TransportError::from)?;
            Ok(ApiResponse { status, body })
        }
        .boxed()
    }
}
