//! # Outbound Ports

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::GenesisChunk;

/// Where the two roles of the source node listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisEndpoints {
    /// Node host.
    pub ip: String,
    /// Consensus RPC port.
    pub rpc_port: u16,
    /// Gateway port.
    pub gateway_port: u16,
}

impl GenesisEndpoints {
    /// Create endpoints.
    pub fn new(ip: impl Into<String>, rpc_port: u16, gateway_port: u16) -> Self {
        Self {
            ip: ip.into(),
            rpc_port,
            gateway_port,
        }
    }
}

/// Source of the genesis document and its checksum.
#[async_trait]
pub trait GenesisSource: Send + Sync {
    /// Chunk `index` from the RPC role.
    async fn genesis_chunk(
        &self,
        endpoints: &GenesisEndpoints,
        index: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<GenesisChunk, FetchError>;

    /// Whole document from the gateway role, raw body.
    async fn gateway_genesis(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError>;

    /// Published checksum from the gateway role, as served.
    async fn genesis_checksum(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: GenesisSource + ?Sized> GenesisSource for Arc<T> {
    async fn genesis_chunk(
        &self,
        endpoints: &GenesisEndpoints,
        index: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<GenesisChunk, FetchError> {
        (**self).genesis_chunk(endpoints, index, timeout, cancel).await
    }

    async fn gateway_genesis(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        (**self).gateway_genesis(endpoints, timeout, cancel).await
    }

    async fn genesis_checksum(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        (**self).genesis_checksum(endpoints, timeout, cancel).await
    }
}
