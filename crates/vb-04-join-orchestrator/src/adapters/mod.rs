//! Adapters: HTTP peer list and file-writing initializer.

pub mod file_initializer;
pub mod peer_list;

pub use file_initializer::FileNodeInitializer;
pub use peer_list::HttpPeerListSource;
