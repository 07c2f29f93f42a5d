//! Adapters for genesis retrieval.

pub mod http_source;

pub use http_source::HttpGenesisSource;
