//! # Adapters
//!
//! HTTP implementation of the [`NodeProbe`](crate::ports::NodeProbe) port.

pub mod http_probe;
pub mod wire;

pub use http_probe::{HttpNodeProbe, ProbeRole};
