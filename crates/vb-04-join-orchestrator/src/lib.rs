//! # Join Orchestrator
//!
//! Composes the crawler, the trust checkpoint resolver and the genesis
//! verifier into one join against a trusted seed, then hands the resulting
//! [`BootstrapConfig`] to a [`NodeInitializer`].
//!
//! ## Sequence
//!
//! ```text
//! status(seed) ──► discover seeds ──┬─► resolve checkpoint (state-sync only)
//!                  (crawl|peer-list) └─► verified genesis
//!                                           │
//!                                           ▼
//!                                   NodeInitializer::initialize
//! ```
//!
//! Discovery failures degrade to the trusted seed alone. Genesis failures,
//! an unreachable seed and an unusable height (with state-sync on) are fatal.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{FileNodeInitializer, HttpPeerListSource};
pub use config::{ConfigError, DiscoveryMode, JoinConfig};
pub use domain::{
    fallback_seed, normalize_seeds, parse_pub_p2p_list, rpc_candidates, seeds_from_topology,
    BootstrapConfig, BootstrapManifest, InitializerError, JoinError, StateSyncSettings,
    STATE_SYNC_TEMP_DIR, TRUST_PERIOD,
};
pub use ports::{NodeInitializer, PeerListSource};
pub use service::{Discovery, JoinOrchestrator, JoinPorts};
