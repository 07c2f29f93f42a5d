//! # Peer Crawler
//!
//! Maps the reachable topology of a network from a single seed.
//!
//! Starting at the seed's `net_info`, every advertised peer is probed with
//! two concurrent queries (`net_info` and `status`). Peers that answer both
//! land in the topology; peers that fail either land in the blacklist. Each
//! IP is probed at most once per scan.
//!
//! ## Bounds
//!
//! | Bound | Config field | Default |
//! |-------|--------------|---------|
//! | recursion depth | `max_depth` | 3 |
//! | concurrent probes | `max_concurrency` | 64 |
//! | visited nodes | `max_nodes` | 2048 |
//! | per-query timeout | `call_timeout_ms` | 5000 |
//! | whole scan | `scan_timeout_secs` | 120 |
//!
//! ## Architecture
//!
//! - **Domain:** crawl state (topology, blacklist, in-flight claims) and errors
//! - **Ports:** [`NodeProbe`] (outbound) and [`NetworkCrawlerApi`] (inbound)
//! - **Adapters:** [`HttpNodeProbe`] for the RPC and gateway roles
//! - **Service:** [`NetworkCrawler`], the bounded task-group scan
//!
//! ## Example
//!
//! ```rust,ignore
//! use vb_01_peer_crawler::{CrawlerConfig, HttpNodeProbe, NetworkCrawler};
//!
//! let probe = HttpNodeProbe::rpc(fetcher);
//! let crawler = NetworkCrawler::new(probe, CrawlerConfig::default());
//! let report = crawler.scan("198.51.100.7", 26657, 3, false).await?;
//! println!("{} reachable, {} blacklisted", report.topology.len(), report.blacklist.len());
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{HttpNodeProbe, ProbeRole};
pub use config::CrawlerConfig;
pub use domain::{Claim, CrawlError, CrawlReport, CrawlState, NetInfo, NodeStatus, PeerEntry};
pub use ports::{NetworkCrawlerApi, NodeProbe, ScanRequest};
pub use service::NetworkCrawler;
