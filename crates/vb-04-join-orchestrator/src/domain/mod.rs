//! Domain layer: seed derivation, the bootstrap hand-off and join errors.

pub mod bootstrap;
pub mod errors;
pub mod seeds;

pub use bootstrap::*;
pub use errors::*;
pub use seeds::*;
