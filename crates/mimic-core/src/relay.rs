//! Outbound call relay shared by `/call` and proxy forwarding.
//!
//! An upstream response is translated into a [`Reply`]:
//! - empty body: status only
//! - body starting with `{` or `[` (after whitespace): decoded JSON
//! - anything else: the raw text as a JSON string
//!
//! Upstream response headers travel with the reply, minus hop-by-hop and
//! body-describing headers.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};
use crate::proxy::ProxyTarget;

const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Request headers decided by the target URL and the outbound body.
const REQUEST_ONLY_HEADERS: &[&str] = &["host", "content-length"];

/// Response headers describing the upstream body, which is re-encoded as JSON.
const BODY_HEADERS: &[&str] = &["content-length", "content-type"];

/// Body of a `POST /call` request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallRequest {
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub body: Option<Value>,
}

impl CallRequest {
    /// Decode a call description from JSON.
    pub fn from_json(data: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(data).map_err(|e| RelayError::Decode(e.to_string()))
    }
}

/// What to send back to the original caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    /// Upstream headers to relay, one value per name.
    pub headers: Vec<(String, String)>,
    /// JSON body; `None` means status only.
    pub body: Option<Value>,
}

impl Reply {
    pub const fn status_only(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Failures while relaying a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("error when decoding request: {0}")]
    Decode(String),

    #[error("error when making request to {url}: error when marshalling request body: {detail}")]
    Encode { url: String, detail: String },

    #[error("error when making request to {url}: {detail}")]
    Dispatch { url: String, detail: String },

    #[error("error when reading response from {url}: {detail}")]
    Read { url: String, detail: String },

    #[error("error when decoding response from {url}: {detail}")]
    ResponseDecode { url: String, detail: String },
}

/// Issues outbound requests through an [`UpstreamClient`].
#[derive(Clone)]
pub struct CallRelay {
    client: Arc<dyn UpstreamClient>,
}

impl CallRelay {
    pub fn new(client: Arc<dyn UpstreamClient>) -> Self {
        Self { client }
    }

    /// Perform the call described by `request`.
    pub async fn call(&self, request: &CallRequest) -> Result<Reply, RelayError> {
        let method = if request.method.trim().is_empty() {
            "GET"
        } else {
            request.method.as_str()
        };

        let mut upstream = UpstreamRequest::new(method, request.url.as_str());
        if let Some(body) = request.body.as_ref().filter(|b| !b.is_null()) {
            let encoded = serde_json::to_vec(body).map_err(|e| RelayError::Encode {
                url: request.url.clone(),
                detail: e.to_string(),
            })?;
            upstream = upstream
                .with_header("content-type", "application/json")
                .with_body(encoded);
        }

        debug!(method = %method, url = %request.url, "Relaying call");
        self.dispatch(upstream).await
    }

    /// Forward a proxied request to `target` with the given headers.
    pub async fn forward(
        &self,
        target: &ProxyTarget,
        headers: Vec<(String, String)>,
    ) -> Result<Reply, RelayError> {
        let mut upstream = UpstreamRequest::new(target.method.as_str(), target.url.as_str());
        upstream.headers = headers;

        debug!(method = %target.method, url = %target.url, "Forwarding proxied request");
        self.dispatch(upstream).await
    }

    async fn dispatch(&self, request: UpstreamRequest) -> Result<Reply, RelayError> {
        let url = request.url.clone();
        match self.client.execute(request).await {
            Ok(response) => translate_response(&url, response),
            Err(UpstreamError::Dispatch(detail)) => {
                warn!(url = %url, "Upstream request failed: {detail}");
                Err(RelayError::Dispatch { url, detail })
            }
            Err(UpstreamError::Read(detail)) => {
                warn!(url = %url, "Reading upstream response failed: {detail}");
                Err(RelayError::Read { url, detail })
            }
        }
    }
}

/// Translate a fully read upstream response into a [`Reply`].
///
/// Text bodies that are not valid UTF-8 are converted lossily.
pub fn translate_response(url: &str, response: UpstreamResponse) -> Result<Reply, RelayError> {
    let UpstreamResponse {
        status,
        headers,
        body,
    } = response;
    let headers = relayed_headers(headers.iter().map(|(n, v)| (n.as_str(), v.as_str())));

    if body.is_empty() {
        return Ok(Reply::status_only(status).with_headers(headers));
    }

    let first = body.iter().copied().find(|b| !b.is_ascii_whitespace());
    let value = if matches!(first, Some(b'{' | b'[')) {
        serde_json::from_slice(&body).map_err(|e| RelayError::ResponseDecode {
            url: url.to_string(),
            detail: e.to_string(),
        })?
    } else {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    };
    Ok(Reply::json(status, value).with_headers(headers))
}

/// Collapse inbound headers into one value per name for forwarding.
///
/// Repeated headers are joined with `"; "` and stray `;`/space characters
/// are trimmed from both ends. Hop-by-hop headers, `host` and
/// `content-length` are dropped.
pub fn forwarded_headers<'a, I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    collapse_headers(headers, REQUEST_ONLY_HEADERS)
}

/// Collapse upstream response headers the same way for the caller.
///
/// Hop-by-hop headers are dropped, as are `content-length` and
/// `content-type` since the reply body is re-encoded.
pub fn relayed_headers<'a, I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    collapse_headers(headers, BODY_HEADERS)
}

fn collapse_headers<'a, I>(headers: I, skipped: &[&str]) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut collapsed: Vec<(String, Vec<&'a str>)> = Vec::new();
    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) || skipped.contains(&name.as_str()) {
            continue;
        }
        match collapsed.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => collapsed.push((name, vec![value])),
        }
    }

    collapsed
        .into_iter()
        .map(|(name, values)| {
            let joined = values.join("; ");
            let trimmed = joined.trim_matches(|c: char| c == ';' || c == ' ').to_string();
            (name, trimmed)
        })
        .collect()
}
