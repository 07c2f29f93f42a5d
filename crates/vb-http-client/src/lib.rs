//! # HTTP Fetcher
//!
//! The single path every outbound call takes. Peers are untrusted, so each
//! request is bounded three ways:
//!
//! | Bound | Failure |
//! |-------|---------|
//! | per-call timeout | `FetchError::Timeout` |
//! | root cancellation token | `FetchError::Cancelled` |
//! | streamed body size cap | `FetchError::TooLarge` |

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use vb_shared_types::FetchError;

/// Fetcher configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Body size cap for ordinary calls.
    pub max_body_bytes: usize,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2000,
            max_body_bytes: 4 * 1024 * 1024,
            user_agent: format!("vb-join/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// `http://host:port/path`, bracketing IPv6 hosts.
pub fn endpoint(host: &str, port: u16, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}/{}", host, port, path)
    } else {
        format!("http://{}:{}/{}", host, port, path)
    }
}

/// Base URL for an address that may or may not carry a scheme.
pub fn base_url(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Cloneable HTTP fetcher. Clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Same pool, different body cap (genesis documents are large).
    pub fn with_body_limit(&self, max_body_bytes: usize) -> Self {
        Self {
            client: self.client.clone(),
            max_body_bytes,
        }
    }

    /// GET `url` and return the raw body.
    pub async fn get_bytes(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled { url: url.to_string() }),
            res = tokio::time::timeout(timeout, self.fetch(url, timeout)) => match res {
                Ok(inner) => inner,
                Err(_) => Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }),
            },
        };

        if let Err(ref e) = result {
            debug!("[vb-http] GET {} failed: {}", url, e);
        }
        result
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let body = self.get_bytes(url, timeout, cancel).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::malformed(url, e.to_string()))
    }

    /// GET `url` and decode the body as UTF-8 text.
    pub async fn get_text(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let body = self.get_bytes(url, timeout, cancel).await?;
        String::from_utf8(body).map_err(|e| FetchError::malformed(url, e.to_string()))
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit,
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, e))?
        {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

fn map_reqwest_error(url: &str, timeout: Duration, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if e.is_connect() {
        FetchError::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else if e.is_builder() {
        FetchError::Transport {
            url: url.to_string(),
            reason: format!("invalid request: {}", e),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
