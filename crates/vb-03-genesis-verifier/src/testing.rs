//! Testing Utilities
//!
//! [`MockGenesisSource`] serves one document through both roles, split into
//! base64 chunks, with the matching checksum. Each part can be overridden.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::{sha256_hex, GenesisChunk};
use crate::ports::{GenesisEndpoints, GenesisSource};

/// In-memory genesis source.
#[derive(Debug)]
pub struct MockGenesisSource {
    chunks: Vec<GenesisChunk>,
    overrides: HashMap<u64, GenesisChunk>,
    gateway: Result<Vec<u8>, FetchError>,
    checksum: String,
    checksum_calls: Mutex<usize>,
}

impl MockGenesisSource {
    /// Serve `document` as `parts` chunks (at least one).
    pub fn serving(document: &[u8], parts: usize) -> Self {
        let parts = parts.max(1);
        let size = document.len().div_ceil(parts).max(1);
        let mut pieces: Vec<&[u8]> = document.chunks(size).collect();
        pieces.resize(parts, &[]);

        let total = parts as u64;
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| GenesisChunk {
                chunk: i as u64,
                total,
                data: STANDARD.encode(piece),
            })
            .collect();

        Self {
            chunks,
            overrides: HashMap::new(),
            gateway: Ok(document.to_vec()),
            checksum: format!("0x{}", sha256_hex(document)),
            checksum_calls: Mutex::new(0),
        }
    }

    /// Serve a different gateway body.
    pub fn with_gateway_body(mut self, body: Vec<u8>) -> Self {
        self.gateway = Ok(body);
        self
    }

    /// Make the gateway document call fail.
    pub fn with_gateway_error(mut self, error: FetchError) -> Self {
        self.gateway = Err(error);
        self
    }

    /// Publish a different checksum.
    pub fn with_checksum(mut self, checksum: &str) -> Self {
        self.checksum = checksum.to_string();
        self
    }

    /// Answer the request for chunk `index` with `chunk`.
    pub fn with_chunk_override(mut self, index: u64, chunk: GenesisChunk) -> Self {
        self.overrides.insert(index, chunk);
        self
    }

    /// How many times the checksum was requested.
    pub fn checksum_calls(&self) -> usize {
        *self.checksum_calls.lock()
    }

    fn check_cancel(url: &str, cancel: &CancellationToken) -> Result<(), FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GenesisSource for MockGenesisSource {
    async fn genesis_chunk(
        &self,
        endpoints: &GenesisEndpoints,
        index: u64,
        _timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<GenesisChunk, FetchError> {
        let url = format!(
            "http://{}:{}/genesis_chunked?chunk={}",
            endpoints.ip, endpoints.rpc_port, index
        );
        Self::check_cancel(&url, cancel)?;
        if let Some(chunk) = self.overrides.get(&index) {
            return Ok(chunk.clone());
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chunks.get(i))
            .cloned()
            .ok_or(FetchError::Status { url, status: 500 })
    }

    async fn gateway_genesis(
        &self,
        endpoints: &GenesisEndpoints,
        _timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let url = format!("http://{}:{}/api/genesis", endpoints.ip, endpoints.gateway_port);
        Self::check_cancel(&url, cancel)?;
        self.gateway.clone()
    }

    async fn genesis_checksum(
        &self,
        endpoints: &GenesisEndpoints,
        _timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let url = format!("http://{}:{}/api/gensum", endpoints.ip, endpoints.gateway_port);
        *self.checksum_calls.lock() += 1;
        Self::check_cancel(&url, cancel)?;
        Ok(self.checksum.clone())
    }
}
