//! # HTTP Block Source
//!
//! `GET {rpc}/block?height=N`, reading `result.block_id.hash` and
//! `result.block.header.height`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_http_client::{base_url, HttpFetcher};
use vb_shared_types::FetchError;

use crate::domain::BlockSummary;
use crate::ports::BlockSource;

#[derive(Deserialize)]
struct BlockEnvelope {
    result: BlockResult,
}

#[derive(Deserialize)]
struct BlockResult {
    block_id: BlockId,
    block: Block,
}

#[derive(Deserialize)]
struct BlockId {
    hash: String,
}

#[derive(Deserialize)]
struct Block {
    header: Header,
}

#[serde_as]
#[derive(Deserialize)]
struct Header {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    height: u64,
}

/// [`BlockSource`] over RPC HTTP.
#[derive(Clone, Debug)]
pub struct HttpBlockSource {
    fetcher: HttpFetcher,
}

impl HttpBlockSource {
    /// Create a block source.
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    /// URL of the block query.
    pub fn block_url(rpc_address: &str, height: u64) -> String {
        format!("{}/block?height={}", base_url(rpc_address), height)
    }
}

#[async_trait]
impl BlockSource for HttpBlockSource {
    async fn block_at(
        &self,
        rpc_address: &str,
        height: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<BlockSummary, FetchError> {
        let url = Self::block_url(rpc_address, height);
        let envelope: BlockEnvelope = self.fetcher.get_json(&url, timeout, cancel).await?;
        Ok(BlockSummary {
            height: envelope.result.block.header.height,
            hash: envelope.result.block_id.hash,
        })
    }
}
