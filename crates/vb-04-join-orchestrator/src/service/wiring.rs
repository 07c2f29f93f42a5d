use std::sync::Arc;
use vb_01_peer_crawler::{HttpNodeProbe, NodeProbe};
use vb_02_trust_checkpoint::{BlockSource, HttpBlockSource};
use vb_03_genesis_verifier::{GenesisSource, HttpGenesisSource};
use vb_http_client::HttpFetcher;

use crate::adapters::HttpPeerListSource;
use crate::config::JoinConfig;
use crate::domain::JoinError;
use crate::ports::PeerListSource;

/// Every outbound port the orchestrator drives.
#[derive(Clone)]
pub struct JoinPorts {
    /// Consensus RPC role (`/status`, `/net_info`).
    pub rpc_probe: Arc<dyn NodeProbe>,
    /// Gateway role (`/api/status`, `/api/net_info`), used for crawling.
    pub gateway_probe: Arc<dyn NodeProbe>,
    /// Gateway public peer list.
    pub peer_list: Arc<dyn PeerListSource>,
    /// Block queries for the trust checkpoint.
    pub blocks: Arc<dyn BlockSource>,
    /// Genesis retrieval.
    pub genesis: Arc<dyn GenesisSource>,
}

impl JoinPorts {
    /// HTTP adapters sharing one connection pool.
    pub fn http(config: &JoinConfig) -> Result<Self, JoinError> {
        let fetcher = HttpFetcher::new(&config.http).map_err(JoinError::Http)?;
        let genesis_fetcher = fetcher.with_body_limit(config.genesis.max_body_bytes);

        Ok(Self {
            rpc_probe: Arc::new(HttpNodeProbe::rpc(fetcher.clone())),
            gateway_probe: Arc::new(HttpNodeProbe::gateway(fetcher.clone())),
            peer_list: Arc::new(HttpPeerListSource::new(fetcher.clone())),
            blocks: Arc::new(HttpBlockSource::new(fetcher)),
            genesis: Arc::new(HttpGenesisSource::new(genesis_fetcher)),
        })
    }
}
