use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug_span, info, warn, Instrument};

use super::explore::{explore, Child, ScanContext};
use crate::config::CrawlerConfig;
use crate::domain::{CrawlError, CrawlReport, CrawlState};
use crate::ports::{NodeProbe, ScanRequest};

/// Network crawler over any [`NodeProbe`].
///
/// `P` may be unsized, so `NetworkCrawler<dyn NodeProbe>` works for callers
/// that pick the probe at runtime.
pub struct NetworkCrawler<P: NodeProbe + ?Sized + 'static> {
    probe: Arc<P>,
    config: CrawlerConfig,
}

impl<P: NodeProbe + 'static> NetworkCrawler<P> {
    /// Create a crawler owning `probe`.
    pub fn new(probe: P, config: CrawlerConfig) -> Self {
        Self::from_arc(Arc::new(probe), config)
    }
}

impl<P: NodeProbe + ?Sized + 'static> NetworkCrawler<P> {
    /// Create a crawler sharing `probe`.
    pub fn from_arc(probe: Arc<P>, config: CrawlerConfig) -> Self {
        Self { probe, config }
    }

    /// Limits in use.
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Map the topology reachable from `seed_ip:seed_port`.
    pub async fn scan(
        &self,
        seed_ip: &str,
        seed_port: u16,
        max_depth: usize,
        ignore_depth: bool,
    ) -> Result<CrawlReport, CrawlError> {
        let mut request = ScanRequest::new(seed_ip, seed_port, max_depth);
        request.ignore_depth = ignore_depth;
        self.scan_with_cancel(request, CancellationToken::new())
            .await
    }

    /// [`scan`](Self::scan) under a caller-owned cancellation token.
    pub async fn scan_with_cancel(
        &self,
        request: ScanRequest,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let seed_ip = request.seed_ip.trim().to_string();
        if seed_ip.is_empty() {
            return Err(CrawlError::InvalidRequest("seed ip is empty".into()));
        }
        if request.seed_port == 0 {
            return Err(CrawlError::InvalidRequest("seed port is 0".into()));
        }

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.scan_timeout();
        let scan_cancel = cancel.child_token();
        let call_timeout = self.config.call_timeout();

        info!(
            "[vb-01] Scanning from seed {}:{} (max_depth={}, ignore_depth={})",
            seed_ip, request.seed_port, request.max_depth, request.ignore_depth
        );

        let seed_info = self
            .probe
            .net_info(&seed_ip, request.seed_port, call_timeout, &scan_cancel)
            .await
            .map_err(|source| {
                if source.is_cancelled() {
                    CrawlError::Cancelled
                } else {
                    CrawlError::SeedUnreachable {
                        seed: format!("{}:{}", seed_ip, request.seed_port),
                        source,
                    }
                }
            })?;

        let ctx = Arc::new(ScanContext {
            probe: Arc::clone(&self.probe),
            state: Mutex::new(CrawlState::new(self.config.max_nodes)),
            permits: Semaphore::new(self.config.max_concurrency.max(1)),
            cancel: scan_cancel.clone(),
            port: self.config.peer_port.unwrap_or(request.seed_port),
            max_depth: request.max_depth,
            ignore_depth: request.ignore_depth,
            call_timeout,
        });

        let mut tasks: JoinSet<Vec<Child>> = JoinSet::new();
        for peer in &seed_info.peers {
            let ip = peer.remote_ip.trim();
            if !ip.is_empty() {
                spawn_probe(&mut tasks, &ctx, ip.to_string(), 0);
            }
        }

        let truncated = loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(children))) => {
                    for (ip, depth) in children {
                        spawn_probe(&mut tasks, &ctx, ip, depth);
                    }
                }
                Ok(Some(Err(e))) => warn!("[vb-01] Probe task failed: {}", e),
                Ok(None) => break scan_cancel.is_cancelled(),
                Err(_) => {
                    warn!(
                        "[vb-01] Scan deadline of {}s reached with {} probes pending",
                        self.config.scan_timeout_secs,
                        tasks.len()
                    );
                    scan_cancel.cancel();
                    tasks.shutdown().await;
                    break true;
                }
            }
        };

        let state = std::mem::take(&mut *ctx.state.lock());
        let report = state.into_report(truncated);

        info!(
            "[vb-01] Scan finished in {:?}: {} nodes saved, seed reported {} peers, {} blacklisted, {} skipped{}",
            started.elapsed(),
            report.topology.len(),
            seed_info.n_peers,
            report.blacklist.len(),
            report.skipped,
            if report.truncated { " (truncated)" } else { "" }
        );

        Ok(report)
    }
}

fn spawn_probe<P: NodeProbe + ?Sized + 'static>(
    tasks: &mut JoinSet<Vec<Child>>,
    ctx: &Arc<ScanContext<P>>,
    ip: String,
    depth: usize,
) {
    let span = debug_span!("probe", ip = %ip, depth);
    tasks.spawn(explore(Arc::clone(ctx), ip, depth).instrument(span));
}
