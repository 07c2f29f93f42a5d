//! Pure decision logic.

pub mod quorum;

pub use quorum::*;
