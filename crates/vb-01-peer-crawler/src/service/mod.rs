//! # Crawler Service
//!
//! Runs a scan as a bounded task group:
//!
//! - one task per candidate IP, joined by a single loop that spawns the
//!   children each finished task hands back
//! - a semaphore caps how many tasks query at once
//! - one deadline for the whole scan; when it passes, outstanding queries
//!   are cancelled and the partial result is returned

mod api;
mod core;
mod explore;

pub use self::core::NetworkCrawler;
