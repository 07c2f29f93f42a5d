//! Probe answers, decoupled from any wire format.

/// One peer from a node's `net_info` answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeerEntry {
    /// Address the reporting node sees this peer connecting from.
    pub remote_ip: String,
    /// Peer node identity.
    pub node_id: String,
    /// Advertised listen address, usually `tcp://ip:port`.
    pub listen_addr: String,
}

impl PeerEntry {
    /// Create a peer entry.
    pub fn new(
        remote_ip: impl Into<String>,
        node_id: impl Into<String>,
        listen_addr: impl Into<String>,
    ) -> Self {
        Self {
            remote_ip: remote_ip.into(),
            node_id: node_id.into(),
            listen_addr: listen_addr.into(),
        }
    }
}

/// A node's `net_info` answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetInfo {
    /// Peer count the node reports.
    pub n_peers: usize,
    /// Peers the node reports.
    pub peers: Vec<PeerEntry>,
}

/// A node's `status` answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeStatus {
    /// Node identity.
    pub node_id: String,
    /// Network (chain) name.
    pub network: String,
    /// Latest block height as reported, decimal string.
    pub latest_block_height: String,
    /// Advertised P2P listen address.
    pub listen_addr: String,
}
