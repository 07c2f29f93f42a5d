//! Service layer: port wiring and the join sequence.

mod orchestrator;
mod wiring;

#[cfg(test)]
mod tests;

pub use orchestrator::{Discovery, JoinOrchestrator};
pub use wiring::JoinPorts;
