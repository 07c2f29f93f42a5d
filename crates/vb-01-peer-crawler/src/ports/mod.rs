//! Ports: the probe the crawler drives and the API it offers.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
