//! Ports: the peer list source and the node initializer hand-off.

pub mod outbound;

pub use outbound::*;
