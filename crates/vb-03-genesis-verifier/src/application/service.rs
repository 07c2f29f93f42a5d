//! # Genesis Verification Service

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vb_shared_types::VerifiedGenesis;

use crate::config::GenesisConfig;
use crate::domain::integrity::{verify_checksum, verify_same_content};
use crate::domain::{ChunkAssembler, GenesisError, GenesisStage};
use crate::ports::{GenesisEndpoints, GenesisSource};

/// Fetches and cross-checks the genesis document.
pub struct GenesisVerifier<S: GenesisSource + ?Sized> {
    source: Arc<S>,
    config: GenesisConfig,
}

impl<S: GenesisSource> GenesisVerifier<S> {
    /// Create a verifier owning `source`.
    pub fn new(source: S, config: GenesisConfig) -> Self {
        Self::from_arc(Arc::new(source), config)
    }
}

impl<S: GenesisSource + ?Sized> GenesisVerifier<S> {
    /// Create a verifier sharing `source`.
    pub fn from_arc(source: Arc<S>, config: GenesisConfig) -> Self {
        Self { source, config }
    }

    /// Fetch the genesis from `ip` and verify it.
    ///
    /// The RPC copy and the gateway copy are fetched concurrently. Their
    /// content is compared before the checksum is requested.
    pub async fn get_verified_genesis(
        &self,
        ip: &str,
        rpc_port: u16,
        gateway_port: u16,
        cancel: &CancellationToken,
    ) -> Result<VerifiedGenesis, GenesisError> {
        let endpoints = GenesisEndpoints::new(ip, rpc_port, gateway_port);
        info!("[vb-03] Getting verified genesis from {}", ip);

        let (rpc_copy, gateway_copy) = tokio::try_join!(
            self.fetch_chunked(&endpoints, cancel),
            self.fetch_gateway(&endpoints, cancel),
        )?;

        debug!(
            "[vb-03] Comparing rpc copy ({} bytes) with gateway copy ({} bytes)",
            rpc_copy.len(),
            gateway_copy.len()
        );
        if let Err(e) = verify_same_content(&rpc_copy, &gateway_copy) {
            warn!("[vb-03] Genesis rejected: {}", e);
            return Err(e);
        }

        let published = self
            .source
            .genesis_checksum(&endpoints, self.config.call_timeout(), cancel)
            .await
            .map_err(|e| GenesisError::fetch(GenesisStage::Checksum, e))?;

        let digest = match verify_checksum(&rpc_copy, &published) {
            Ok(digest) => digest,
            Err(e) => {
                warn!("[vb-03] Genesis rejected: {}", e);
                return Err(e);
            }
        };

        info!(
            "[vb-03] Genesis verified: {} bytes, sha256 {}",
            rpc_copy.len(),
            digest
        );
        Ok(VerifiedGenesis::new(rpc_copy, digest))
    }

    async fn fetch_chunked(
        &self,
        endpoints: &GenesisEndpoints,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, GenesisError> {
        let mut assembler = ChunkAssembler::new(self.config.max_chunks, self.config.max_body_bytes);
        while !assembler.is_complete() {
            let index = assembler.next_index();
            let chunk = self
                .source
                .genesis_chunk(endpoints, index, self.config.call_timeout(), cancel)
                .await
                .map_err(|e| GenesisError::fetch(GenesisStage::RpcChunk(index), e))?;
            debug!("[vb-03] Got genesis chunk {}/{}", chunk.chunk + 1, chunk.total);
            assembler.push(chunk)?;
        }
        assembler.finish()
    }

    async fn fetch_gateway(
        &self,
        endpoints: &GenesisEndpoints,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, GenesisError> {
        self.source
            .gateway_genesis(endpoints, self.config.call_timeout(), cancel)
            .await
            .map_err(|e| GenesisError::fetch(GenesisStage::Gateway, e))
    }
}
