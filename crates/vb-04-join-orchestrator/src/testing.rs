//! Testing Utilities
//!
//! Mock ports for driving [`JoinOrchestrator`](crate::JoinOrchestrator)
//! without sockets. Available with the `test-utils` feature flag.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_01_peer_crawler::testing::StaticTopology;
use vb_02_trust_checkpoint::testing::MockBlockSource;
use vb_03_genesis_verifier::testing::MockGenesisSource;
use vb_shared_types::FetchError;

use crate::domain::{BootstrapConfig, InitializerError};
use crate::ports::{NodeInitializer, PeerListSource};
use crate::service::JoinPorts;

/// Fixed public peer list answer.
#[derive(Debug)]
pub struct MockPeerList {
    answer: Result<String, FetchError>,
    calls: Mutex<usize>,
}

impl MockPeerList {
    /// Serve `body`.
    pub fn serving(body: &str) -> Self {
        Self {
            answer: Ok(body.to_string()),
            calls: Mutex::new(0),
        }
    }

    /// Fail every request with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self {
            answer: Err(error),
            calls: Mutex::new(0),
        }
    }

    /// How many times the list was requested.
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl Default for MockPeerList {
    fn default() -> Self {
        Self::serving("")
    }
}

#[async_trait]
impl PeerListSource for MockPeerList {
    async fn pub_p2p_list(
        &self,
        ip: &str,
        gateway_port: u16,
        _timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        *self.calls.lock() += 1;
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: format!("http://{}:{}/api/pub_p2p_list", ip, gateway_port),
            });
        }
        self.answer.clone()
    }
}

/// Initializer that records what it was handed.
#[derive(Debug, Default)]
pub struct RecordingInitializer {
    seen: Mutex<Vec<BootstrapConfig>>,
    failure: Option<String>,
}

impl RecordingInitializer {
    /// Accept every configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every configuration with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    /// Configurations received so far.
    pub fn received(&self) -> Vec<BootstrapConfig> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl NodeInitializer for RecordingInitializer {
    async fn initialize(&self, config: &BootstrapConfig) -> Result<(), InitializerError> {
        self.seen.lock().push(config.clone());
        match &self.failure {
            Some(reason) => Err(reason.clone().into()),
            None => Ok(()),
        }
    }
}

/// Ports backed by in-memory mocks. Both probe roles share `network`.
pub fn mock_ports(
    network: Arc<StaticTopology>,
    peer_list: Arc<MockPeerList>,
    blocks: MockBlockSource,
    genesis: Arc<MockGenesisSource>,
) -> JoinPorts {
    JoinPorts {
        rpc_probe: network.clone(),
        gateway_probe: network,
        peer_list,
        blocks: Arc::new(blocks),
        genesis,
    }
}
