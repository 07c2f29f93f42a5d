//! Ports for checkpoint resolution.

pub mod outbound;

pub use outbound::*;
