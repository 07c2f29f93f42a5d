//! Ports for genesis retrieval.

pub mod outbound;

pub use outbound::*;
