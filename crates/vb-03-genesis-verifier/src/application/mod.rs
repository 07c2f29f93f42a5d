//! Application layer.

mod service;

pub use service::GenesisVerifier;
