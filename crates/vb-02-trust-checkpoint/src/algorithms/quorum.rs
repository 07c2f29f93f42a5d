//! # Checkpoint Quorum
//!
//! Group observations by hash. The largest group wins if it has at least
//! `min_agreeing` distinct servers and no other group is as large. The
//! outcome depends only on the set of observations, not on arrival order.

use std::collections::{BTreeMap, BTreeSet};
use vb_shared_types::SyncCheckpoint;

use crate::domain::Observation;

/// Decide the checkpoint for `target_height`.
///
/// Observations for other heights are ignored. A server appearing more than
/// once counts once per hash it reported.
pub fn decide_checkpoint(
    observations: &[Observation],
    target_height: u64,
    min_agreeing: usize,
) -> Option<SyncCheckpoint> {
    let mut groups: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.height == target_height) {
        groups
            .entry(obs.hash.as_str())
            .or_default()
            .insert(obs.rpc_server.as_str());
    }

    let largest = groups.values().map(BTreeSet::len).max()?;
    let mut leaders = groups.iter().filter(|(_, servers)| servers.len() == largest);
    let (hash, servers) = leaders.next()?;
    if leaders.next().is_some() || largest < min_agreeing.max(1) {
        return None;
    }

    Some(SyncCheckpoint {
        rpc_servers: servers.iter().map(|s| s.to_string()).collect(),
        trust_height: target_height,
        trust_hash: hash.to_string(),
    })
}
