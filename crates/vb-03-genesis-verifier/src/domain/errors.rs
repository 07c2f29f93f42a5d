//! Genesis verification errors.

use std::fmt;
use thiserror::Error;
use vb_shared_types::FetchError;

/// Which retrieval step a fetch failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisStage {
    /// Chunked RPC endpoint, at this chunk index.
    RpcChunk(u64),
    /// Gateway genesis endpoint.
    Gateway,
    /// Gateway checksum endpoint.
    Checksum,
}

impl fmt::Display for GenesisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RpcChunk(index) => write!(f, "rpc genesis chunk {}", index),
            Self::Gateway => write!(f, "gateway genesis"),
            Self::Checksum => write!(f, "genesis checksum"),
        }
    }
}

/// Errors from genesis verification. All of them are fatal to a join.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    /// The RPC and gateway copies differ.
    #[error("files content are not identical")]
    FilesContentNotIdentical,

    /// The published checksum does not match the RPC copy.
    #[error("sha256 checksum mismatch: expected {expected}, got {actual}")]
    Sha256ChecksumMismatch {
        /// Checksum published by the gateway, normalised.
        expected: String,
        /// SHA-256 of the RPC copy.
        actual: String,
    },

    /// A response was structurally invalid.
    #[error("malformed genesis data: {0}")]
    Malformed(String),

    /// A call failed.
    #[error("failed to fetch {stage}: {source}")]
    Fetch {
        /// Step that failed.
        stage: GenesisStage,
        /// Underlying failure.
        #[source]
        source: FetchError,
    },

    /// Verification was cancelled.
    #[error("genesis verification cancelled")]
    Cancelled,
}

impl GenesisError {
    /// Map a fetch failure, keeping cancellation distinct.
    pub fn fetch(stage: GenesisStage, source: FetchError) -> Self {
        if source.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Fetch { stage, source }
        }
    }
}
