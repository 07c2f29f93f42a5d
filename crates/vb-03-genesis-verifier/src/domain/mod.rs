//! Domain layer: chunk model, integrity checks, errors.

pub mod chunks;
pub mod errors;
pub mod integrity;

pub use chunks::*;
pub use errors::*;
pub use integrity::*;
