//! # Driven Ports (Outbound SPI)
//!
//! What the crawler needs from the network.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::{NetInfo, NodeStatus};

/// Queries one node's discovery endpoints.
///
/// Implementations must honour both `timeout` and `cancel`: a cancelled
/// call returns `FetchError::Cancelled` so the crawler can tell it apart
/// from a genuinely unreachable peer.
#[async_trait]
pub trait NodeProbe: Send + Sync {
    /// Peer count and peer list.
    async fn net_info(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NetInfo, FetchError>;

    /// Node identity and sync status.
    async fn status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NodeStatus, FetchError>;
}

#[async_trait]
impl<T: NodeProbe + ?Sized> NodeProbe for Arc<T> {
    async fn net_info(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NetInfo, FetchError> {
        (**self).net_info(host, port, timeout, cancel).await
    }

    async fn status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NodeStatus, FetchError> {
        (**self).status(host, port, timeout, cancel).await
    }
}
