//! # Driving Ports (Inbound API)

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{CrawlError, CrawlReport};

/// Parameters of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Seed host.
    pub seed_ip: String,
    /// Port the seed (and, unless configured otherwise, every peer) is probed on.
    pub seed_port: u16,
    /// Depth past which peers are not expanded.
    pub max_depth: usize,
    /// Expand regardless of depth.
    pub ignore_depth: bool,
}

impl ScanRequest {
    /// Create a request.
    pub fn new(seed_ip: impl Into<String>, seed_port: u16, max_depth: usize) -> Self {
        Self {
            seed_ip: seed_ip.into(),
            seed_port,
            max_depth,
            ignore_depth: false,
        }
    }

    /// Expand regardless of depth.
    pub fn ignoring_depth(mut self) -> Self {
        self.ignore_depth = true;
        self
    }
}

/// Network crawling API.
#[async_trait]
pub trait NetworkCrawlerApi: Send + Sync {
    /// Map the topology reachable from the request's seed.
    ///
    /// Cancelling `cancel` stops the scan; whatever was observed so far is
    /// returned with `truncated` set.
    async fn crawl(
        &self,
        request: ScanRequest,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError>;
}
