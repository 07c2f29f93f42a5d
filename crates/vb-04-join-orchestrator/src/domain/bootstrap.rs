//! # Bootstrap Configuration
//!
//! The hand-off to the node initializer: network identity, optional
//! state-sync checkpoint and the verified genesis.

use serde::{Deserialize, Serialize};
use vb_shared_types::{NetworkInfo, SyncCheckpoint, VerifiedGenesis};

/// Trust period written into state-sync settings.
pub const TRUST_PERIOD: &str = "168h0m0s";

/// Scratch directory for state-sync snapshots.
pub const STATE_SYNC_TEMP_DIR: &str = "/tmp";

/// State-sync section of the node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSyncSettings {
    /// Always `true` when present.
    pub enable: bool,
    /// Comma-joined `host:port` RPC servers.
    pub rpc_servers: String,
    /// Trusted height.
    pub trust_height: u64,
    /// Trusted block hash.
    pub trust_hash: String,
    /// Light-client trust period.
    pub trust_period: String,
    /// Snapshot scratch directory.
    pub temp_dir: String,
}

/// Everything the node needs to start.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Network identity and seeds.
    pub network: NetworkInfo,
    /// Agreed checkpoint, if state-sync was requested and a quorum formed.
    pub sync_checkpoint: Option<SyncCheckpoint>,
    /// Verified genesis document.
    pub genesis: VerifiedGenesis,
    /// Whether state-sync was requested.
    pub state_sync_enabled: bool,
}

impl BootstrapConfig {
    /// Comma-joined seed list for the P2P section.
    pub fn p2p_seeds(&self) -> String {
        self.network.seeds.join(",")
    }

    /// State-sync settings, present only when state-sync is on and a
    /// checkpoint exists.
    pub fn state_sync_settings(&self) -> Option<StateSyncSettings> {
        if !self.state_sync_enabled {
            return None;
        }
        self.sync_checkpoint
            .as_ref()
            .map(|checkpoint| StateSyncSettings {
                enable: true,
                rpc_servers: checkpoint.rpc_servers.join(","),
                trust_height: checkpoint.trust_height,
                trust_hash: checkpoint.trust_hash.clone(),
                trust_period: TRUST_PERIOD.to_string(),
                temp_dir: STATE_SYNC_TEMP_DIR.to_string(),
            })
    }

    /// Serializable summary (everything but the genesis bytes).
    pub fn manifest(&self) -> BootstrapManifest {
        BootstrapManifest {
            network: self.network.clone(),
            p2p_seeds: self.p2p_seeds(),
            sync_checkpoint: self.sync_checkpoint.clone(),
            state_sync: self.state_sync_settings(),
            genesis_sha256: self.genesis.sha256().to_string(),
            genesis_bytes: self.genesis.len(),
        }
    }
}

/// `bootstrap.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapManifest {
    /// Network identity and seeds.
    pub network: NetworkInfo,
    /// Comma-joined seeds.
    pub p2p_seeds: String,
    /// Agreed checkpoint.
    pub sync_checkpoint: Option<SyncCheckpoint>,
    /// State-sync settings.
    pub state_sync: Option<StateSyncSettings>,
    /// Genesis digest.
    pub genesis_sha256: String,
    /// Genesis size in bytes.
    pub genesis_bytes: usize,
}
