//! Domain Layer - crawl bookkeeping with no I/O
//!
//! - Probe answers as the crawler sees them (`NetInfo`, `NodeStatus`)
//! - The shared crawl state and its claim rules
//! - Crawl errors

pub mod entities;
pub mod errors;
pub mod state;

pub use entities::*;
pub use errors::*;
pub use state::*;
