//! `reqwest`-backed implementation of the upstream client port.

use async_trait::async_trait;
use reqwest::{Client, Method};

use mimic_core::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};

use crate::headers::utf8_pairs;

/// Sends relayed and proxied requests with a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: Client,
}

impl ReqwestUpstream {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the default client.
    pub fn with_defaults() -> reqwest::Result<Self> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            UpstreamError::Dispatch(format!("invalid method '{}': {e}", request.method))
        })?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError::Dispatch(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = utf8_pairs(response.headers())
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Read(e.to_string()))?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
