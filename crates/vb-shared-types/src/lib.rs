//! # Shared Types Crate
//!
//! Domain objects exchanged between the bootstrap subsystems and handed to the
//! external node initializer.
//!
//! ## Clusters
//!
//! - **Topology**: `Node`, `BlacklistedNode`, `QueryFailure`
//! - **Checkpoint**: `SyncCheckpoint`
//! - **Genesis**: `VerifiedGenesis`
//! - **Network**: `NetworkInfo`, `SeedAddress`
//!
//! Every value in here is derived from untrusted peer responses. Types only
//! carry data that already passed the validation of the subsystem that
//! produced them.

pub mod address;
pub mod entities;
pub mod errors;
pub mod wire;

pub use address::{parse_host_port, parse_listen_addr, AddressError, SeedAddress, TCP_SCHEME};
pub use entities::*;
pub use errors::FetchError;
pub use wire::string_or_number;
