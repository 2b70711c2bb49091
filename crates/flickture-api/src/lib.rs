//! Resilient client for the Flickture REST API.
//!
//! Every call goes through one [`ApiClient`], which runs a fixed middleware
//! pipeline around the HTTP transport: in-flight de-duplication, error
//! surfacing (notification plus forced logout on 401), bounded retry of
//! transient failures, and token injection.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod fingerprint;
pub mod message;
pub mod middleware;
pub mod request;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::{ApiError, ApiResult, TransportError, TransportErrorKind};
pub use fingerprint::Fingerprint;
pub use request::{ApiRequest, ApiResponse};
pub use transport::{HttpTransport, Transport};
