//! # Genesis Verifier
//!
//! Fetches the genesis document twice, from two independent roles of the
//! same node, and accepts it only if:
//!
//! 1. the chunked RPC copy and the gateway copy have identical content, and
//! 2. the gateway's published checksum equals the SHA-256 of the RPC copy.
//!
//! The content check runs first; the checksum is not fetched when it fails.
//!
//! ```rust,ignore
//! let verifier = GenesisVerifier::new(HttpGenesisSource::new(fetcher), GenesisConfig::default());
//! let genesis = verifier.get_verified_genesis("198.51.100.7", 26657, 11000, &cancel).await?;
//! std::fs::write("genesis.json", genesis.as_bytes())?;
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::HttpGenesisSource;
pub use application::GenesisVerifier;
pub use config::GenesisConfig;
pub use domain::{
    canonical_form, normalize_checksum, sha256_hex, GenesisChunk, GenesisError, GenesisStage,
};
pub use ports::{GenesisEndpoints, GenesisSource};
