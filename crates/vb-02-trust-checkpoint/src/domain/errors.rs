//! # Trust Resolver Errors
//!
//! Per-candidate failures are not errors; they only lower the vote count.

use thiserror::Error;

/// Errors that prevent resolution from running at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustError {
    /// Height 0 has no block.
    #[error("invalid target height {0}")]
    InvalidTargetHeight(u64),

    /// Resolution was cancelled.
    #[error("checkpoint resolution cancelled")]
    Cancelled,
}
