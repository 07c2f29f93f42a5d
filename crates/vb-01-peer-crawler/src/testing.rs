//! Testing Utilities
//!
//! An in-memory network for driving the crawler without sockets.
//! Available with the `test-utils` feature flag.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::{NetInfo, NodeStatus, PeerEntry};
use crate::ports::NodeProbe;

/// P2P port used in generated listen addresses.
pub const MOCK_P2P_PORT: u16 = 26656;

#[derive(Debug, Clone)]
struct MockNode {
    id: String,
    network: String,
    height: String,
    n_peers: Option<usize>,
    peers: Vec<PeerEntry>,
    status_error: Option<FetchError>,
}

/// A fixed, in-memory network.
///
/// Hosts that were never added behave as unreachable: both queries fail
/// with `FetchError::Connection`.
///
/// # Example
///
/// ```rust,ignore
/// use vb_01_peer_crawler::testing::StaticTopology;
///
/// let net = StaticTopology::new()
///     .with_node("198.51.100.7", &["203.0.113.4", "203.0.113.5"])
///     .with_node("203.0.113.5", &["198.51.100.7"]);
/// assert_eq!(net.net_info_calls("203.0.113.4"), 0);
/// ```
#[derive(Debug, Default)]
pub struct StaticTopology {
    nodes: HashMap<String, MockNode>,
    delay: Duration,
    calls: Mutex<HashMap<String, usize>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl StaticTopology {
    /// Empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity the mock reports for `ip`.
    pub fn node_id(ip: &str) -> String {
        format!("node-{}", ip.replace([':', '.'], "-"))
    }

    /// Peer entry whose remote and listen IP are both `ip`.
    pub fn peer(ip: &str) -> PeerEntry {
        PeerEntry::new(
            ip,
            Self::node_id(ip),
            format!("tcp://{}:{}", ip, MOCK_P2P_PORT),
        )
    }

    /// Add a reachable node peered with `peers`.
    pub fn with_node(self, ip: &str, peers: &[&str]) -> Self {
        let entries = peers.iter().map(|p| Self::peer(p)).collect();
        self.with_peer_entries(ip, entries)
    }

    /// Add a reachable node with explicit peer entries.
    pub fn with_peer_entries(mut self, ip: &str, peers: Vec<PeerEntry>) -> Self {
        self.nodes.insert(
            ip.to_string(),
            MockNode {
                id: Self::node_id(ip),
                network: "testnet-1".to_string(),
                height: "100".to_string(),
                n_peers: None,
                peers,
                status_error: None,
            },
        );
        self
    }

    /// Override the peer count `ip` reports.
    pub fn with_reported_peer_count(mut self, ip: &str, n_peers: usize) -> Self {
        if let Some(node) = self.nodes.get_mut(ip) {
            node.n_peers = Some(n_peers);
        }
        self
    }

    /// Override what the status query of `ip` reports.
    pub fn with_status(mut self, ip: &str, id: &str, network: &str, height: &str) -> Self {
        if let Some(node) = self.nodes.get_mut(ip) {
            node.id = id.to_string();
            node.network = network.to_string();
            node.height = height.to_string();
        }
        self
    }

    /// Make the status query of `ip` fail.
    pub fn with_failing_status(mut self, ip: &str, error: FetchError) -> Self {
        if let Some(node) = self.nodes.get_mut(ip) {
            node.status_error = Some(error);
        }
        self
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many `net_info` queries `ip` received.
    pub fn net_info_calls(&self, ip: &str) -> usize {
        self.calls.lock().get(ip).copied().unwrap_or(0)
    }

    /// Most `net_info` queries in progress at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn wait(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        if self.delay.is_zero() {
            return if cancel.is_cancelled() {
                Err(FetchError::Cancelled { url: url.to_string() })
            } else {
                Ok(())
            };
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled { url: url.to_string() }),
            _ = tokio::time::sleep(self.delay.min(timeout)) => {}
        }
        if self.delay > timeout {
            return Err(FetchError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        Ok(())
    }

    fn lookup(&self, host: &str, url: &str) -> Result<&MockNode, FetchError> {
        self.nodes.get(host).ok_or_else(|| FetchError::Connection {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

#[async_trait]
impl NodeProbe for StaticTopology {
    async fn net_info(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NetInfo, FetchError> {
        let url = format!("http://{}:{}/net_info", host, port);
        *self.calls.lock().entry(host.to_string()).or_insert(0) += 1;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let waited = self.wait(&url, timeout, cancel).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        waited?;

        let node = self.lookup(host, &url)?;
        Ok(NetInfo {
            n_peers: node.n_peers.unwrap_or(node.peers.len()),
            peers: node.peers.clone(),
        })
    }

    async fn status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NodeStatus, FetchError> {
        let url = format!("http://{}:{}/status", host, port);
        self.wait(&url, timeout, cancel).await?;

        let node = self.lookup(host, &url)?;
        if let Some(error) = &node.status_error {
            return Err(error.clone());
        }
        Ok(NodeStatus {
            node_id: node.id.clone(),
            network: node.network.clone(),
            latest_block_height: node.height.clone(),
            listen_addr: format!("tcp://{}:{}", host, MOCK_P2P_PORT),
        })
    }
}
