//! HTTP transport: one GET, status and body back

use std::time::Duration;

use tracing::debug;

use crate::error::{RedListError, Result};
use crate::request::{Request, TransportOptions};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Status code and raw body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Thin wrapper over a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    /// Build a transport honoring the proxy and timeout in `options`
    pub fn new(options: &TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(
            options
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        );

        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| RedListError::Config(format!("invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| RedListError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Perform a single GET; no retries
    pub async fn execute(&self, request: &Request) -> Result<RawResponse> {
        let mut builder = self.http.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(url = %request.url, status, bytes = body.len(), "Red List response");

        Ok(RawResponse { status, body })
    }
}
