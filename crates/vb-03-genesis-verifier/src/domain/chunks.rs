//! # Chunked Genesis
//!
//! The RPC endpoint serves the document as base64 chunks
//! `{chunk, total, data}`. Chunks are requested in order starting at 0.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::GenesisError;

/// One chunk as served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisChunk {
    /// Index of this chunk.
    pub chunk: u64,
    /// Total number of chunks.
    pub total: u64,
    /// Base64 payload.
    pub data: String,
}

/// Reassembles chunks, checking that the server stays consistent.
#[derive(Debug)]
pub struct ChunkAssembler {
    total: Option<u64>,
    next: u64,
    bytes: Vec<u8>,
    max_chunks: u64,
    max_bytes: usize,
}

impl ChunkAssembler {
    /// New assembler with limits on chunk count and document size.
    pub fn new(max_chunks: u64, max_bytes: usize) -> Self {
        Self {
            total: None,
            next: 0,
            bytes: Vec::new(),
            max_chunks,
            max_bytes,
        }
    }

    /// Index to request next.
    pub fn next_index(&self) -> u64 {
        self.next
    }

    /// True once every chunk has been pushed.
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.next >= total)
    }

    /// Add the answer to the request for [`next_index`](Self::next_index).
    pub fn push(&mut self, chunk: GenesisChunk) -> Result<(), GenesisError> {
        if chunk.chunk != self.next {
            return Err(GenesisError::Malformed(format!(
                "requested chunk {} but got chunk {}",
                self.next, chunk.chunk
            )));
        }

        match self.total {
            None => {
                if chunk.total == 0 {
                    return Err(GenesisError::Malformed("chunk total is 0".into()));
                }
                if chunk.total > self.max_chunks {
                    return Err(GenesisError::Malformed(format!(
                        "chunk total {} exceeds limit {}",
                        chunk.total, self.max_chunks
                    )));
                }
                self.total = Some(chunk.total);
            }
            Some(total) if total != chunk.total => {
                return Err(GenesisError::Malformed(format!(
                    "chunk total changed from {} to {}",
                    total, chunk.total
                )));
            }
            Some(_) => {}
        }

        let decoded = STANDARD
            .decode(chunk.data.trim())
            .map_err(|e| GenesisError::Malformed(format!("chunk {}: {}", chunk.chunk, e)))?;
        if self.bytes.len() + decoded.len() > self.max_bytes {
            return Err(GenesisError::Malformed(format!(
                "genesis exceeds {} bytes",
                self.max_bytes
            )));
        }
        self.bytes.extend_from_slice(&decoded);
        self.next += 1;
        Ok(())
    }

    /// The assembled document.
    pub fn finish(self) -> Result<Vec<u8>, GenesisError> {
        if !self.is_complete() {
            return Err(GenesisError::Malformed(format!(
                "genesis incomplete after {} chunks",
                self.next
            )));
        }
        Ok(self.bytes)
    }
}
