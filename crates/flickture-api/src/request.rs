use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::fingerprint::Fingerprint;

/// A request to the remote API, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a single query parameter.
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append query parameters from any struct or map that serializes to a
    /// JSON object. `null` fields are skipped; arrays become repeated keys.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params).map_err(|e| ApiError::Serialize(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ApiError::Serialize(
                "query parameters must serialize to an object".into(),
            ));
        };
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        self.query.push((key.clone(), scalar_to_string(item)));
                    }
                }
                other => self.query.push((key, scalar_to_string(other))),
            }
        }
        Ok(self)
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body =
            Some(serde_json::to_value(body).map_err(|e| ApiError::Serialize(e.to_string()))?);
        Ok(self)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.method, &self.path, &self.query, self.body.as_ref())
    }

    /// Resolve against the base URL. The path is appended to the base path
    /// rather than replacing it, so `/movies` under `http://host/api/v1`
    /// becomes `http://host/api/v1/movies`.
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// A received HTTP response with its body read to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
