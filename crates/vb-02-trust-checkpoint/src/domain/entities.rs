//! Block observations.

/// What a server reports about one block.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlockSummary {
    /// `block.header.height`.
    pub height: u64,
    /// `block_id.hash`.
    pub hash: String,
}

/// An accepted answer: the server reported the target height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    /// `host:port` of the server.
    pub rpc_server: String,
    /// Height the server reported.
    pub height: u64,
    /// Block hash the server reported.
    pub hash: String,
}

impl Observation {
    /// Accept `block` from `rpc_server` if it is for `target_height` and has a hash.
    pub fn accept(rpc_server: &str, target_height: u64, block: BlockSummary) -> Option<Self> {
        let hash = block.hash.trim();
        if block.height != target_height || hash.is_empty() {
            return None;
        }
        Some(Self {
            rpc_server: rpc_server.to_string(),
            height: block.height,
            hash: hash.to_string(),
        })
    }
}
