//! # Seed Derivation
//!
//! Turns discovery output into canonical `tcp://<id>@<host>:<port>` seeds and
//! the RPC candidates the trust resolver queries. Entries that do not parse
//! are dropped; the result is deduplicated and sorted.

use std::collections::BTreeSet;
use tracing::debug;
use vb_shared_types::{SeedAddress, Topology};

/// Parse the gateway's public peer list (`id@ip:port` per line).
pub fn parse_pub_p2p_list(body: &str) -> Vec<String> {
    normalize_seeds(body.lines())
}

/// Seeds for every topology node with a non-empty id and ip.
///
/// Topology keys are the probed IPs.
pub fn seeds_from_topology(topology: &Topology, p2p_port: u16) -> Vec<String> {
    let seeds = topology
        .values()
        .filter(|node| !node.id.trim().is_empty() && !node.ip.trim().is_empty())
        .map(|node| SeedAddress::new(node.id.trim(), node.ip.trim(), p2p_port).to_string());
    normalize_seeds(seeds)
}

/// Parse, deduplicate and sort seed strings. Blank and invalid entries are
/// dropped.
pub fn normalize_seeds<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seeds = BTreeSet::new();
    for entry in entries {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }
        match SeedAddress::parse(entry) {
            Ok(seed) => {
                seeds.insert(seed.to_string());
            }
            Err(e) => debug!("[vb-04] Dropping seed entry: {}", e),
        }
    }
    seeds.into_iter().collect()
}

/// `host:rpc_port` for every seed, deduplicated and sorted.
pub fn rpc_candidates(seeds: &[String], rpc_port: u16) -> Vec<String> {
    seeds
        .iter()
        .filter_map(|s| SeedAddress::parse(s).ok())
        .map(|seed| seed.with_port(rpc_port))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The trusted seed itself, used when discovery finds nothing.
pub fn fallback_seed(node_id: &str, seed_ip: &str, p2p_port: u16) -> String {
    SeedAddress::new(node_id.trim(), seed_ip.trim(), p2p_port).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_shared_types::Node;

    #[test]
    fn test_pub_p2p_list_lines() {
        let body = "\nbbb@10.0.0.2:26656\naaa@10.0.0.1:26656\n\n  aaa@10.0.0.1:26656  \nnot-a-seed\n";
        assert_eq!(
            parse_pub_p2p_list(body),
            vec![
                "tcp://aaa@10.0.0.1:26656".to_string(),
                "tcp://bbb@10.0.0.2:26656".to_string(),
            ]
        );
        assert!(parse_pub_p2p_list("").is_empty());
    }

    #[test]
    fn test_seeds_from_topology_skips_anonymous_nodes() {
        let mut topology = Topology::new();
        topology.insert(
            "10.0.0.2".into(),
            Node {
                ip: "10.0.0.2".into(),
                id: "N2".into(),
                peer_count: 0,
                peers: vec![],
            },
        );
        topology.insert(
            "10.0.0.3".into(),
            Node {
                ip: "10.0.0.3".into(),
                id: " ".into(),
                peer_count: 0,
                peers: vec![],
            },
        );

        assert_eq!(
            seeds_from_topology(&topology, 26656),
            vec!["tcp://N2@10.0.0.2:26656".to_string()]
        );
    }

    #[test]
    fn test_rpc_candidates_swap_port() {
        let seeds = vec![
            "tcp://a@10.0.0.1:26656".to_string(),
            "tcp://b@10.0.0.1:36656".to_string(),
            "tcp://c@[2001:db8::1]:26656".to_string(),
        ];
        assert_eq!(
            rpc_candidates(&seeds, 26657),
            vec!["10.0.0.1:26657".to_string(), "[2001:db8::1]:26657".to_string()]
        );
    }

    #[test]
    fn test_fallback_seed() {
        assert_eq!(
            fallback_seed("N1", "198.51.100.7", 26656),
            "tcp://N1@198.51.100.7:26656"
        );
    }
}
