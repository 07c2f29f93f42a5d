//! # Crawl State
//!
//! The one structure every probe task shares. A task must claim an IP here
//! before issuing any query for it, which is what keeps each IP to a single
//! probe per scan and keeps the topology and blacklist disjoint.
//!
//! Callers wrap this in a mutex and never hold the lock across a query.

use serde::Serialize;
use std::collections::BTreeSet;
use vb_shared_types::{Blacklist, BlacklistedNode, Node, QueryFailure, Topology};

/// Outcome of [`CrawlState::try_claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The caller now owns the IP and must finish it.
    Claimed,
    /// Already in the topology.
    Known,
    /// Already in the blacklist.
    Blacklisted,
    /// Claimed by another task.
    InFlight,
    /// The visited-node cap is reached.
    CapReached,
}

/// Shared bookkeeping for one scan.
#[derive(Debug, Default)]
pub struct CrawlState {
    topology: Topology,
    blacklist: Blacklist,
    in_flight: BTreeSet<String>,
    skipped: BTreeSet<String>,
    max_nodes: usize,
}

impl CrawlState {
    /// Empty state allowing at most `max_nodes` distinct IPs.
    pub fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            ..Self::default()
        }
    }

    /// IPs that are known, blacklisted or being probed.
    pub fn visited(&self) -> usize {
        self.topology.len() + self.blacklist.len() + self.in_flight.len()
    }

    /// Check and claim `ip` in one step.
    pub fn try_claim(&mut self, ip: &str) -> Claim {
        if self.topology.contains_key(ip) {
            return Claim::Known;
        }
        if self.blacklist.contains_key(ip) {
            return Claim::Blacklisted;
        }
        if self.in_flight.contains(ip) {
            return Claim::InFlight;
        }
        if self.visited() >= self.max_nodes {
            self.skipped.insert(ip.to_string());
            return Claim::CapReached;
        }
        self.in_flight.insert(ip.to_string());
        Claim::Claimed
    }

    /// Store a node that answered both queries.
    pub fn record_node(&mut self, node: Node) {
        self.in_flight.remove(&node.ip);
        if !self.blacklist.contains_key(&node.ip) {
            self.topology.insert(node.ip.clone(), node);
        }
    }

    /// Blacklist `ip` with the queries that failed.
    pub fn record_failure(&mut self, ip: &str, errors: Vec<QueryFailure>) {
        self.in_flight.remove(ip);
        self.topology.remove(ip);
        self.blacklist.insert(
            ip.to_string(),
            BlacklistedNode {
                ip: ip.to_string(),
                errors,
            },
        );
    }

    /// Drop a claim without recording anything (the probe was cancelled).
    pub fn release(&mut self, ip: &str) {
        self.in_flight.remove(ip);
    }

    /// Finish the scan.
    pub fn into_report(self, truncated: bool) -> CrawlReport {
        CrawlReport {
            topology: self.topology,
            blacklist: self.blacklist,
            skipped: self.skipped.len(),
            truncated,
        }
    }
}

/// Result of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Nodes that answered both queries, keyed by IP.
    pub topology: Topology,
    /// Nodes that failed at least one query, keyed by IP.
    pub blacklist: Blacklist,
    /// Distinct IPs not probed because the visited-node cap was reached.
    pub skipped: usize,
    /// Whether the scan deadline or cancellation cut the scan short.
    pub truncated: bool,
}

impl CrawlReport {
    /// True if no IP is in both maps.
    pub fn is_disjoint(&self) -> bool {
        self.topology
            .keys()
            .all(|ip| !self.blacklist.contains_key(ip))
    }
}
