//! Adapters for checkpoint resolution.

pub mod block_source;

pub use block_source::HttpBlockSource;
