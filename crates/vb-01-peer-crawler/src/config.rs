//! Crawler configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Depth past which peers are not expanded.
    pub max_depth: usize,

    /// Expand regardless of depth (bounded by `max_nodes` and the deadline).
    pub ignore_depth: bool,

    /// Maximum number of nodes probed at the same time.
    pub max_concurrency: usize,

    /// Maximum number of distinct IPs claimed in one scan.
    pub max_nodes: usize,

    /// Timeout for each `net_info` / `status` query in milliseconds.
    pub call_timeout_ms: u64,

    /// Deadline for the whole scan in seconds.
    pub scan_timeout_secs: u64,

    /// Port used to probe discovered peers. `None` reuses the seed port.
    pub peer_port: Option<u16>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            ignore_depth: false,
            max_concurrency: 64,
            max_nodes: 2048,
            call_timeout_ms: 5_000,
            scan_timeout_secs: 120,
            peer_port: None,
        }
    }
}

impl CrawlerConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing() -> Self {
        Self {
            max_concurrency: 8,
            max_nodes: 256,
            call_timeout_ms: 200,
            scan_timeout_secs: 5,
            ..Self::default()
        }
    }

    /// Per-query timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Whole-scan deadline.
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }
}
