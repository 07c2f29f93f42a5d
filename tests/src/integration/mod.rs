//! Join scenarios spanning crawler, resolver, verifier and orchestrator.

pub mod http_stack;
pub mod join_flow;
