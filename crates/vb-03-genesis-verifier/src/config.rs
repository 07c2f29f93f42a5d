//! # Genesis Verifier Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits for genesis retrieval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Timeout for each genesis call in seconds.
    pub call_timeout_secs: u64,
    /// Largest `total` accepted from the chunked endpoint.
    pub max_chunks: u64,
    /// Size cap of the assembled document and of each response body.
    pub max_body_bytes: usize,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 40,
            max_chunks: 4096,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl GenesisConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            call_timeout_secs: 2,
            max_chunks: 64,
            max_body_bytes: 1024 * 1024,
        }
    }

    /// Per-call timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
