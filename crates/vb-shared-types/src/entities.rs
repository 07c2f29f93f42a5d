//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Topology**: what a crawl observed about reachable and unreachable peers.
//! - **Checkpoint**: the `(height, hash)` pair state-sync may trust.
//! - **Genesis**: the verified initial chain state.
//! - **Network**: what the join orchestrator learned about the target network.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::FetchError;

// =============================================================================
// CLUSTER A: TOPOLOGY
// =============================================================================

/// One network participant as observed by a crawl step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Node {
    /// Address the node was queried at. For entries in `peers` this is the
    /// `ip:port` parsed from the peer's advertised listen address.
    pub ip: String,
    /// Node identity as reported by its status endpoint.
    pub id: String,
    /// Peer count as reported by the node's net-info endpoint.
    pub peer_count: usize,
    /// Peers the node reported, one level deep.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<Node>,
}

impl Node {
    /// A leaf entry used inside another node's peer list.
    pub fn peer_ref(ip: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            id: id.into(),
            peer_count: 0,
            peers: Vec::new(),
        }
    }
}

/// The discovery query a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Peer list / peer count query.
    NetInfo,
    /// Node identity query.
    Status,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetInfo => write!(f, "net_info"),
            Self::Status => write!(f, "status"),
        }
    }
}

/// One failed discovery query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFailure {
    /// Which query failed.
    pub query: QueryKind,
    /// Why it failed.
    pub error: FetchError,
}

/// A node whose discovery queries failed during the current crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlacklistedNode {
    /// Address that was queried.
    pub ip: String,
    /// Every failed query, in `NetInfo`, `Status` order.
    pub errors: Vec<QueryFailure>,
}

/// IP → observed node. Ordered so that reports are stable across runs.
pub type Topology = BTreeMap<String, Node>;

/// IP → unreachable node.
pub type Blacklist = BTreeMap<String, BlacklistedNode>;

// =============================================================================
// CLUSTER B: CHECKPOINT
// =============================================================================

/// A block checkpoint agreed on by at least two independent RPC servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCheckpoint {
    /// RPC servers (`host:port`) that reported the agreed block, sorted.
    pub rpc_servers: Vec<String>,
    /// Height of the agreed block.
    pub trust_height: u64,
    /// Block-ID hash of the agreed block.
    pub trust_hash: String,
}

// =============================================================================
// CLUSTER C: GENESIS
// =============================================================================

/// Genesis bytes that passed the two-role comparison and the checksum check.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifiedGenesis {
    bytes: Vec<u8>,
    sha256: String,
}

impl VerifiedGenesis {
    /// Wrap bytes whose digest has already been checked.
    pub fn new(bytes: Vec<u8>, sha256: String) -> Self {
        Self { bytes, sha256 }
    }

    /// Raw genesis document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase SHA-256 hex digest of the bytes.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume into the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for VerifiedGenesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedGenesis")
            .field("len", &self.bytes.len())
            .field("sha256", &self.sha256)
            .finish()
    }
}

// =============================================================================
// CLUSTER D: NETWORK
// =============================================================================

/// What the orchestrator learned about the network it is joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Chain / network identifier reported by the seed.
    pub network_name: String,
    /// Seed node identity.
    pub node_id: String,
    /// Seed's latest block height, as reported.
    pub block_height: String,
    /// Canonical `tcp://<id>@<ip>:<p2p_port>` seed strings.
    pub seeds: Vec<String>,
}

impl NetworkInfo {
    /// Latest block height as a number.
    pub fn block_height(&self) -> Option<u64> {
        self.block_height.trim().parse().ok()
    }
}
