//! Crawl errors.

use thiserror::Error;
use vb_shared_types::FetchError;

/// Errors that end a scan before any topology is produced.
///
/// Failures of individual peers never surface here; they go to the
/// blacklist of the [`CrawlReport`](super::CrawlReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    /// The seed's peer list could not be fetched.
    #[error("seed {seed} is unreachable: {source}")]
    SeedUnreachable {
        /// `host:port` of the seed.
        seed: String,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The scan was cancelled before the seed answered.
    #[error("scan cancelled")]
    Cancelled,

    /// Scan parameters are unusable.
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),
}
