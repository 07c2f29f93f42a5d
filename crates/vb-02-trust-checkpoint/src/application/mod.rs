//! Application layer.

mod service;

pub use service::TrustCheckpointResolver;
