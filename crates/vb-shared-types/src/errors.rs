//! # Error Types
//!
//! Errors shared across subsystems. `FetchError` is stored inside blacklist
//! entries, so it is `Clone` and carries its context as plain strings.

use serde::Serialize;
use thiserror::Error;

/// Failure of one outbound HTTP call to a peer-controlled host.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The per-call deadline elapsed.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// TCP/TLS connection could not be established.
    #[error("cannot connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    /// Peer answered with a non-success status code.
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// Body exceeded the configured size cap.
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    /// Body could not be decoded into the expected shape.
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// The root cancellation token fired before the call finished.
    #[error("request to {url} cancelled")]
    Cancelled { url: String },

    /// Any other transport failure.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl FetchError {
    /// Build a `Malformed` error.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// URL of the failed call.
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Connection { url, .. }
            | Self::Status { url, .. }
            | Self::TooLarge { url, .. }
            | Self::Malformed { url, .. }
            | Self::Cancelled { url }
            | Self::Transport { url, .. } => url,
        }
    }

    /// True when the failure was caused by cancellation rather than the peer.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = FetchError::Timeout {
            url: "http://10.0.0.1:26657/status".to_string(),
            timeout_ms: 5000,
        };
        assert!(err.to_string().contains("5000 ms"));
        assert_eq!(err.url(), "http://10.0.0.1:26657/status");
    }

    #[test]
    fn test_cancelled_is_not_a_peer_failure() {
        let err = FetchError::Cancelled {
            url: "http://x".to_string(),
        };
        assert!(err.is_cancelled());
        assert!(!FetchError::malformed("http://x", "bad json").is_cancelled());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let err = FetchError::Status {
            url: "http://x".to_string(),
            status: 502,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "status");
        assert_eq!(json["status"], 502);
    }
}
