//! # Trust Checkpoint Resolver
//!
//! Picks the `(height, hash)` pair state-sync may trust.
//!
//! Every candidate RPC server is asked for the block at the target height.
//! Answers for a different height, failed calls, and answers disagreeing
//! with the largest agreeing group are rejected. The checkpoint exists
//! only when at least two independent servers agree; otherwise the result
//! is `Ok(None)` and state-sync stays off.
//!
//! ## Architecture
//!
//! - **Algorithms:** the order-independent quorum rule
//! - **Ports:** [`BlockSource`]
//! - **Adapters:** [`HttpBlockSource`] (`/block?height=N`)
//! - **Application:** [`TrustCheckpointResolver`], concurrent fan-out into one collector

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::HttpBlockSource;
pub use algorithms::decide_checkpoint;
pub use application::TrustCheckpointResolver;
pub use config::TrustConfig;
pub use domain::{BlockSummary, Observation, TrustError};
pub use ports::BlockSource;
