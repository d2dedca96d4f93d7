//! Outbound HTTP client port.
//!
//! Both `/call` and proxy forwarding dispatch through this trait, so the
//! core never deals with DNS, TLS or sockets.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// HTTP method as given by the caller (e.g. `GET`).
    pub method: String,
    /// Absolute target URL.
    pub url: String,
    /// Headers to send, one value per name.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<Bytes>,
}

impl UpstreamRequest {
    /// Create a request without headers or body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A fully read upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// Upstream status code.
    pub status: u16,
    /// Response headers in arrival order; names may repeat.
    pub headers: Vec<(String, String)>,
    /// Complete response body.
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Failures reported by an upstream client.
///
/// The message carries only the transport's own detail; callers add the
/// target URL when presenting it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The request could not be built or sent (bad method, DNS, refused...).
    #[error("{0}")]
    Dispatch(String),

    /// The response arrived but its body could not be read.
    #[error("{0}")]
    Read(String),
}

/// Port for issuing outbound HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Send `request` and read the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Dispatch`] when the request cannot be sent
    /// and [`UpstreamError::Read`] when the body cannot be read.
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}
