//! # Trust Resolver Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for checkpoint resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Timeout for each block query in milliseconds.
    pub call_timeout_ms: u64,
    /// Minimum number of servers that must report the same hash.
    pub min_agreeing: usize,
    /// Maximum number of block queries in flight.
    pub max_concurrency: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 3_000,
            min_agreeing: 2,
            max_concurrency: 32,
        }
    }
}

impl TrustConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            call_timeout_ms: 200,
            max_concurrency: 4,
            ..Self::default()
        }
    }

    /// Per-query timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}
