//! # Outbound Ports

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::BlockSummary;

/// Source of block headers.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Block at `height` as reported by the RPC server at `rpc_address` (`host:port`).
    async fn block_at(
        &self,
        rpc_address: &str,
        height: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<BlockSummary, FetchError>;
}

#[async_trait]
impl<T: BlockSource + ?Sized> BlockSource for Arc<T> {
    async fn block_at(
        &self,
        rpc_address: &str,
        height: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<BlockSummary, FetchError> {
        (**self).block_at(rpc_address, height, timeout, cancel).await
    }
}
