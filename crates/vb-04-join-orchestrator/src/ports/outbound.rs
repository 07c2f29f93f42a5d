//! # Driven Ports (Outbound SPI)

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::{BootstrapConfig, InitializerError};

/// Serves the gateway's public peer list.
#[async_trait]
pub trait PeerListSource: Send + Sync {
    /// Raw newline-separated `id@ip:port` body.
    async fn pub_p2p_list(
        &self,
        ip: &str,
        gateway_port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PeerListSource + ?Sized> PeerListSource for Arc<T> {
    async fn pub_p2p_list(
        &self,
        ip: &str,
        gateway_port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        (**self).pub_p2p_list(ip, gateway_port, timeout, cancel).await
    }
}

/// Consumes the bootstrap configuration (writes node config, starts the node).
#[async_trait]
pub trait NodeInitializer: Send + Sync {
    /// Materialise `config`.
    async fn initialize(&self, config: &BootstrapConfig) -> Result<(), InitializerError>;
}

#[async_trait]
impl<T: NodeInitializer + ?Sized> NodeInitializer for Arc<T> {
    async fn initialize(&self, config: &BootstrapConfig) -> Result<(), InitializerError> {
        (**self).initialize(config).await
    }
}
