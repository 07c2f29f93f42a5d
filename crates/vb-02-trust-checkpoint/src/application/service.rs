//! # Trust Checkpoint Service
//!
//! One task per candidate, each sending its accepted observation into a
//! shared channel. The collector here is the only owner of the results; it
//! stops when the last sender is dropped.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, info, Instrument};
use vb_shared_types::SyncCheckpoint;

use crate::algorithms::decide_checkpoint;
use crate::config::TrustConfig;
use crate::domain::{Observation, TrustError};
use crate::ports::BlockSource;

/// Resolves a [`SyncCheckpoint`] from candidate RPC servers.
pub struct TrustCheckpointResolver<S: BlockSource + ?Sized + 'static> {
    source: Arc<S>,
    config: TrustConfig,
}

impl<S: BlockSource + 'static> TrustCheckpointResolver<S> {
    /// Create a resolver owning `source`.
    pub fn new(source: S, config: TrustConfig) -> Self {
        Self::from_arc(Arc::new(source), config)
    }
}

impl<S: BlockSource + ?Sized + 'static> TrustCheckpointResolver<S> {
    /// Create a resolver sharing `source`.
    pub fn from_arc(source: Arc<S>, config: TrustConfig) -> Self {
        Self { source, config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Resolve the checkpoint at `target_height`.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - at least `min_agreeing` servers agree on the hash
    /// * `Ok(None)` - no quorum; state-sync should stay off
    /// * `Err(_)` - invalid height or cancellation
    pub async fn resolve(
        &self,
        candidates: &[String],
        target_height: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<SyncCheckpoint>, TrustError> {
        if target_height == 0 {
            return Err(TrustError::InvalidTargetHeight(target_height));
        }

        let servers: BTreeSet<String> = candidates
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if servers.is_empty() {
            info!("[vb-02] No RPC candidates, state-sync disabled");
            return Ok(None);
        }

        info!(
            "[vb-02] Querying {} RPC servers for block {}",
            servers.len(),
            target_height
        );

        let (tx, mut rx) = mpsc::channel::<Observation>(servers.len());
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let timeout = self.config.call_timeout();
        let mut tasks = JoinSet::new();

        for server in servers {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);
            let cancel = cancel.clone();
            let span = debug_span!("block_probe", rpc = %server);

            tasks.spawn(
                async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return;
                    };
                    match source
                        .block_at(&server, target_height, timeout, &cancel)
                        .await
                    {
                        Ok(block) => match Observation::accept(&server, target_height, block) {
                            Some(obs) => {
                                let _ = tx.send(obs).await;
                            }
                            None => debug!("[vb-02] {} rejected: wrong height or empty hash", server),
                        },
                        Err(e) => debug!("[vb-02] {} rejected: {}", server, e),
                    }
                }
                .instrument(span),
            );
        }
        drop(tx);

        let mut observations = Vec::new();
        while let Some(obs) = rx.recv().await {
            observations.push(obs);
        }
        drop(tasks);

        if cancel.is_cancelled() {
            return Err(TrustError::Cancelled);
        }

        let checkpoint = decide_checkpoint(&observations, target_height, self.config.min_agreeing);
        match &checkpoint {
            Some(cp) => info!(
                "[vb-02] Trusting block {} hash {} from {} servers",
                cp.trust_height,
                cp.trust_hash,
                cp.rpc_servers.len()
            ),
            None => info!(
                "[vb-02] No quorum at height {} ({} accepted answers), state-sync disabled",
                target_height,
                observations.len()
            ),
        }
        Ok(checkpoint)
    }
}
