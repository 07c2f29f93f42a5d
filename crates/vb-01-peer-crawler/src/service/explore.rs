//! One probe task: claim, query, record, hand back children.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};
use vb_shared_types::{parse_listen_addr, FetchError, Node, QueryFailure, QueryKind};

use crate::domain::{Claim, CrawlState, NetInfo, NodeStatus, PeerEntry};
use crate::ports::NodeProbe;

/// `(ip, depth)` to probe next.
pub(crate) type Child = (String, usize);

/// Everything a probe task shares with the scan.
pub(crate) struct ScanContext<P: ?Sized> {
    pub probe: Arc<P>,
    pub state: Mutex<CrawlState>,
    pub permits: Semaphore,
    pub cancel: CancellationToken,
    pub port: u16,
    pub max_depth: usize,
    pub ignore_depth: bool,
    pub call_timeout: Duration,
}

/// Result of querying one node.
#[derive(Debug)]
enum Probe {
    Reached { node: Node, peers: Vec<PeerEntry> },
    Failed(Vec<QueryFailure>),
    Cancelled,
}

pub(crate) async fn explore<P: NodeProbe + ?Sized>(
    ctx: Arc<ScanContext<P>>,
    ip: String,
    depth: usize,
) -> Vec<Child> {
    if !ctx.ignore_depth && depth >= ctx.max_depth {
        return Vec::new();
    }

    let claim = ctx.state.lock().try_claim(&ip);
    if claim != Claim::Claimed {
        trace!("[vb-01] Not probing {}: {:?}", ip, claim);
        return Vec::new();
    }

    let Ok(permit) = ctx.permits.acquire().await else {
        ctx.state.lock().release(&ip);
        return Vec::new();
    };
    if ctx.cancel.is_cancelled() {
        ctx.state.lock().release(&ip);
        return Vec::new();
    }

    let (net_info, status) = tokio::join!(
        ctx.probe
            .net_info(&ip, ctx.port, ctx.call_timeout, &ctx.cancel),
        ctx.probe.status(&ip, ctx.port, ctx.call_timeout, &ctx.cancel),
    );
    drop(permit);

    match evaluate(&ip, net_info, status) {
        Probe::Reached { node, peers } => {
            trace!(
                "[vb-01] {} reachable, id={}, {} peers",
                ip,
                node.id,
                node.peer_count
            );
            ctx.state.lock().record_node(node);
            children_of(&peers, depth)
        }
        Probe::Failed(errors) => {
            info!(
                "[vb-01] Adding <{}> to blacklist: {}",
                ip,
                errors
                    .iter()
                    .map(|f| format!("{}: {}", f.query, f.error))
                    .collect::<Vec<_>>()
                    .join("; ")
            );
            ctx.state.lock().record_failure(&ip, errors);
            Vec::new()
        }
        Probe::Cancelled => {
            ctx.state.lock().release(&ip);
            Vec::new()
        }
    }
}

fn evaluate(
    ip: &str,
    net_info: Result<NetInfo, FetchError>,
    status: Result<NodeStatus, FetchError>,
) -> Probe {
    match (net_info, status) {
        (Ok(info), Ok(status)) => {
            let peer_refs = info
                .peers
                .iter()
                .filter_map(|p| {
                    parse_listen_addr(&p.listen_addr)
                        .ok()
                        .map(|addr| Node::peer_ref(addr.to_string(), p.node_id.clone()))
                })
                .collect();
            Probe::Reached {
                node: Node {
                    ip: ip.to_string(),
                    id: status.node_id,
                    peer_count: info.n_peers,
                    peers: peer_refs,
                },
                peers: info.peers,
            }
        }
        (net_info, status) => {
            let errors: Vec<QueryFailure> = [
                (QueryKind::NetInfo, net_info.err()),
                (QueryKind::Status, status.err()),
            ]
            .into_iter()
            .filter_map(|(query, error)| error.map(|error| QueryFailure { query, error }))
            .collect();

            if errors.iter().any(|f| f.error.is_cancelled()) {
                Probe::Cancelled
            } else {
                Probe::Failed(errors)
            }
        }
    }
}

/// Remote IP of every peer plus its listen IP when that differs.
/// Unspecified listen hosts (`0.0.0.0`, `::`) are not probe targets.
fn children_of(peers: &[PeerEntry], depth: usize) -> Vec<Child> {
    let next = depth + 1;
    let mut children = Vec::with_capacity(peers.len());
    for peer in peers {
        let remote = peer.remote_ip.trim();
        if !remote.is_empty() {
            children.push((remote.to_string(), next));
        }
        if let Ok(addr) = parse_listen_addr(&peer.listen_addr) {
            let host = addr.ip();
            if !host.is_unspecified() && host.to_string() != remote {
                children.push((host.to_string(), next));
            }
        }
    }
    children
}
