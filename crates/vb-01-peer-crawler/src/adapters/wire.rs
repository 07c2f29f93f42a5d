//! JSON shapes of the discovery endpoints.
//!
//! RPC endpoints wrap the payload in `{"result": ...}`; gateway endpoints
//! return it bare. Counts and heights arrive as strings on some builds and
//! as numbers on others, so both are accepted.

use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use vb_shared_types::string_or_number;

use crate::domain::{NetInfo, NodeStatus, PeerEntry};

/// `{"result": T}`
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    /// Payload.
    pub result: T,
}

/// `net_info` payload.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct WireNetInfo {
    /// Peer count, `"3"` or `3`.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub n_peers: u64,
    /// Connected peers.
    #[serde(default)]
    pub peers: Vec<WirePeer>,
}

/// One entry of `net_info.peers`.
#[derive(Debug, Deserialize)]
pub struct WirePeer {
    /// Peer node info.
    #[serde(default)]
    pub node_info: WireNodeInfo,
    /// Address the peer connected from.
    #[serde(default)]
    pub remote_ip: String,
}

/// `node_info` object, shared by `net_info` peers and `status`.
#[derive(Debug, Default, Deserialize)]
pub struct WireNodeInfo {
    /// Node identity.
    #[serde(default)]
    pub id: String,
    /// Advertised listen address.
    #[serde(default)]
    pub listen_addr: String,
    /// Network name.
    #[serde(default)]
    pub network: String,
}

/// `status` payload.
#[derive(Debug, Deserialize)]
pub struct WireStatus {
    /// Node info; required.
    pub node_info: WireNodeInfo,
    /// Sync info.
    #[serde(default)]
    pub sync_info: WireSyncInfo,
}

/// `status.sync_info`.
#[derive(Debug, Default, Deserialize)]
pub struct WireSyncInfo {
    /// Latest block height, `"123"` or `123`.
    #[serde(default, deserialize_with = "string_or_number")]
    pub latest_block_height: String,
}

impl From<WireNetInfo> for NetInfo {
    fn from(wire: WireNetInfo) -> Self {
        Self {
            n_peers: usize::try_from(wire.n_peers).unwrap_or(usize::MAX),
            peers: wire
                .peers
                .into_iter()
                .map(|p| PeerEntry {
                    remote_ip: p.remote_ip,
                    node_id: p.node_info.id,
                    listen_addr: p.node_info.listen_addr,
                })
                .collect(),
        }
    }
}

impl From<WireStatus> for NodeStatus {
    fn from(wire: WireStatus) -> Self {
        Self {
            node_id: wire.node_info.id,
            network: wire.node_info.network,
            latest_block_height: wire.sync_info.latest_block_height,
            listen_addr: wire.node_info.listen_addr,
        }
    }
}
