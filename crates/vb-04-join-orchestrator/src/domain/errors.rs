//! Join errors.

use thiserror::Error;
use vb_02_trust_checkpoint::TrustError;
use vb_03_genesis_verifier::GenesisError;
use vb_shared_types::FetchError;

use crate::config::ConfigError;

/// Boxed error returned by a [`NodeInitializer`](crate::ports::NodeInitializer).
pub type InitializerError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal join failures.
#[derive(Debug, Error)]
pub enum JoinError {
    /// The trusted seed did not answer its status query.
    #[error("Trusted seed {seed} did not report its status: {source}")]
    SeedStatus {
        /// `host:port` queried.
        seed: String,
        /// Underlying failure.
        #[source]
        source: FetchError,
    },

    /// The seed's latest height cannot be used as a trust target.
    #[error("Seed reported an unusable block height {0:?}")]
    InvalidBlockHeight(String),

    /// Checkpoint resolution failed.
    #[error(transparent)]
    Trust(#[from] TrustError),

    /// Genesis verification failed.
    #[error(transparent)]
    Genesis(#[from] GenesisError),

    /// The node initializer rejected the bootstrap configuration.
    #[error("Node initializer failed: {0}")]
    Initializer(#[source] InitializerError),

    /// The whole join exceeded its deadline.
    #[error("Join did not complete within {secs}s")]
    Timeout {
        /// Deadline in seconds.
        secs: u64,
    },

    /// The join was cancelled by the caller.
    #[error("Join cancelled")]
    Cancelled,

    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Http(#[source] FetchError),
}

impl JoinError {
    /// True for caller-driven cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled
                | Self::Trust(TrustError::Cancelled)
                | Self::Genesis(GenesisError::Cancelled)
        )
    }
}
