//! # Join Sequence
//!
//! 1. status of the trusted seed (RPC role)
//! 2. seed discovery (crawl, peer list or none), falling back to the seed
//! 3. trust checkpoint and verified genesis, concurrently
//! 4. hand-off to the [`NodeInitializer`]
//!
//! Every call below runs under one root cancellation token. The join-wide
//! deadline cancels it.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use vb_01_peer_crawler::{CrawlError, CrawlReport, NetworkCrawler, NodeProbe, ScanRequest};
use vb_02_trust_checkpoint::{BlockSource, TrustCheckpointResolver};
use vb_03_genesis_verifier::{GenesisSource, GenesisVerifier};
use vb_shared_types::{NetworkInfo, SyncCheckpoint, VerifiedGenesis};

use super::wiring::JoinPorts;
use crate::config::{DiscoveryMode, JoinConfig};
use crate::domain::{
    fallback_seed, parse_pub_p2p_list, rpc_candidates, seeds_from_topology, BootstrapConfig,
    JoinError,
};
use crate::ports::{NodeInitializer, PeerListSource};

/// Result of seed discovery.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Canonical seeds, sorted. Empty when discovery found nothing.
    pub seeds: Vec<String>,
    /// The crawl report, in crawl mode when the crawl ran.
    pub crawl: Option<CrawlReport>,
}

/// Drives a full join against one trusted seed.
pub struct JoinOrchestrator {
    config: JoinConfig,
    rpc_probe: Arc<dyn NodeProbe>,
    peer_list: Arc<dyn PeerListSource>,
    crawler: NetworkCrawler<dyn NodeProbe>,
    resolver: TrustCheckpointResolver<dyn BlockSource>,
    verifier: GenesisVerifier<dyn GenesisSource>,
}

impl JoinOrchestrator {
    /// Create an orchestrator over explicit ports.
    pub fn new(config: JoinConfig, ports: JoinPorts) -> Self {
        let crawler = NetworkCrawler::from_arc(ports.gateway_probe, config.crawler.clone());
        let resolver = TrustCheckpointResolver::from_arc(ports.blocks, config.trust.clone());
        let verifier = GenesisVerifier::from_arc(ports.genesis, config.genesis.clone());
        Self {
            config,
            rpc_probe: ports.rpc_probe,
            peer_list: ports.peer_list,
            crawler,
            resolver,
            verifier,
        }
    }

    /// Validate `config` and wire the HTTP adapters.
    pub fn http(config: JoinConfig) -> Result<Self, JoinError> {
        config.validate()?;
        let ports = JoinPorts::http(&config)?;
        Ok(Self::new(config, ports))
    }

    /// Configuration in use.
    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Seed status plus discovered seeds.
    pub async fn network_info(&self, cancel: &CancellationToken) -> Result<NetworkInfo, JoinError> {
        let seed_ip = self.config.seed_ip.trim();
        let status = self
            .rpc_probe
            .status(
                seed_ip,
                self.config.rpc_port,
                self.config.crawler.call_timeout(),
                cancel,
            )
            .await
            .map_err(|source| {
                if source.is_cancelled() {
                    JoinError::Cancelled
                } else {
                    JoinError::SeedStatus {
                        seed: format!("{}:{}", seed_ip, self.config.rpc_port),
                        source,
                    }
                }
            })?;

        info!(
            "[vb-04] Seed {} is {} on {} at height {}",
            seed_ip, status.node_id, status.network, status.latest_block_height
        );

        let mut seeds = self.discover(cancel).await?.seeds;
        if seeds.is_empty() {
            let fallback = fallback_seed(&status.node_id, seed_ip, self.config.p2p_port);
            warn!(
                "[vb-04] Discovery found no seeds, falling back to trusted seed {}",
                fallback
            );
            seeds.push(fallback);
        }

        Ok(NetworkInfo {
            network_name: status.network,
            node_id: status.node_id,
            block_height: status.latest_block_height,
            seeds,
        })
    }

    /// Discover seeds per the configured [`DiscoveryMode`].
    ///
    /// Discovery failures are not fatal: they yield no seeds. Cancellation is.
    pub async fn discover(&self, cancel: &CancellationToken) -> Result<Discovery, JoinError> {
        let seed_ip = self.config.seed_ip.trim();
        let p2p_port = self.config.p2p_port;

        let discovery = match self.config.discovery {
            DiscoveryMode::None => Discovery::default(),
            DiscoveryMode::Crawl => {
                let request = ScanRequest {
                    seed_ip: seed_ip.to_string(),
                    seed_port: self.config.gateway_port,
                    max_depth: self.config.crawler.max_depth,
                    ignore_depth: self.config.crawler.ignore_depth,
                };
                match self.crawler.scan_with_cancel(request, cancel.child_token()).await {
                    Ok(report) => Discovery {
                        seeds: seeds_from_topology(&report.topology, p2p_port),
                        crawl: Some(report),
                    },
                    Err(CrawlError::Cancelled) => return Err(JoinError::Cancelled),
                    Err(e) => {
                        warn!("[vb-04] Crawl failed: {}", e);
                        Discovery::default()
                    }
                }
            }
            DiscoveryMode::PeerList => match self
                .peer_list
                .pub_p2p_list(
                    seed_ip,
                    self.config.gateway_port,
                    self.config.crawler.call_timeout(),
                    cancel,
                )
                .await
            {
                Ok(body) => Discovery {
                    seeds: parse_pub_p2p_list(&body),
                    crawl: None,
                },
                Err(e) if e.is_cancelled() => return Err(JoinError::Cancelled),
                Err(e) => {
                    warn!("[vb-04] Public peer list unavailable: {}", e);
                    Discovery::default()
                }
            },
        };

        if cancel.is_cancelled() {
            return Err(JoinError::Cancelled);
        }

        info!(
            "[vb-04] Discovery ({}) found {} seeds",
            self.config.discovery,
            discovery.seeds.len()
        );
        Ok(discovery)
    }

    /// Everything but the hand-off.
    pub async fn prepare(&self, cancel: &CancellationToken) -> Result<BootstrapConfig, JoinError> {
        let network = self.network_info(cancel).await?;
        let state_sync = self.config.state_sync;

        let (sync_checkpoint, genesis) = tokio::try_join!(
            self.checkpoint(&network, cancel),
            self.genesis(cancel),
        )?;

        if state_sync && sync_checkpoint.is_none() {
            warn!("[vb-04] No trust checkpoint agreed, state-sync stays off");
        }

        Ok(BootstrapConfig {
            network,
            sync_checkpoint,
            genesis,
            state_sync_enabled: state_sync,
        })
    }

    /// Run the join and hand the result to `initializer`.
    pub async fn join<I>(&self, initializer: &I) -> Result<BootstrapConfig, JoinError>
    where
        I: NodeInitializer + ?Sized,
    {
        self.join_with_cancel(initializer, CancellationToken::new())
            .await
    }

    /// [`join`](Self::join) under a caller-owned cancellation token.
    pub async fn join_with_cancel<I>(
        &self,
        initializer: &I,
        cancel: CancellationToken,
    ) -> Result<BootstrapConfig, JoinError>
    where
        I: NodeInitializer + ?Sized,
    {
        let started = Instant::now();
        let root = cancel.child_token();
        let secs = self.config.join_timeout_secs;

        let span = info_span!("join", seed = %self.config.seed_ip.trim());
        let prepared = match tokio::time::timeout(
            self.config.join_timeout(),
            self.prepare(&root).instrument(span),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                root.cancel();
                warn!("[vb-04] Join deadline of {}s reached", secs);
                return Err(JoinError::Timeout { secs });
            }
        };

        initializer
            .initialize(&prepared)
            .await
            .map_err(JoinError::Initializer)?;

        info!(
            "[vb-04] Join finished in {:?}: network {}, {} seeds, state-sync {}, genesis sha256 {}",
            started.elapsed(),
            prepared.network.network_name,
            prepared.network.seeds.len(),
            if prepared.state_sync_settings().is_some() { "on" } else { "off" },
            prepared.genesis.sha256()
        );
        Ok(prepared)
    }

    async fn checkpoint(
        &self,
        network: &NetworkInfo,
        cancel: &CancellationToken,
    ) -> Result<Option<SyncCheckpoint>, JoinError> {
        if !self.config.state_sync {
            return Ok(None);
        }
        let height = match network.block_height() {
            Some(height) if height > 0 => height,
            _ => return Err(JoinError::InvalidBlockHeight(network.block_height.clone())),
        };
        let candidates = rpc_candidates(&network.seeds, self.config.rpc_port);
        let span = info_span!("resolve", height, candidates = candidates.len());
        Ok(self
            .resolver
            .resolve(&candidates, height, cancel)
            .instrument(span)
            .await?)
    }

    async fn genesis(&self, cancel: &CancellationToken) -> Result<VerifiedGenesis, JoinError> {
        let span = info_span!("verify_genesis");
        Ok(self
            .verifier
            .get_verified_genesis(
                self.config.seed_ip.trim(),
                self.config.rpc_port,
                self.config.gateway_port,
                cancel,
            )
            .instrument(span)
            .await?)
    }
}
