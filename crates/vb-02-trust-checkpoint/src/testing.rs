//! Testing Utilities
//!
//! In-memory [`BlockSource`] with per-server answers. Servers that were
//! never added refuse the connection.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_shared_types::FetchError;

use crate::domain::BlockSummary;
use crate::ports::BlockSource;

#[derive(Debug, Clone)]
enum Answer {
    Block(BlockSummary),
    Slow(Duration),
}

/// Mock block source.
#[derive(Debug, Default)]
pub struct MockBlockSource {
    answers: HashMap<String, Answer>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockBlockSource {
    /// Source where every server is unreachable.
    pub fn new() -> Self {
        Self::default()
    }

    /// `server` reports a block with this height and hash.
    pub fn with_block(mut self, server: &str, height: u64, hash: &str) -> Self {
        self.answers.insert(
            server.to_string(),
            Answer::Block(BlockSummary {
                height,
                hash: hash.to_string(),
            }),
        );
        self
    }

    /// `server` answers only after `delay`.
    pub fn with_slow_server(mut self, server: &str, delay: Duration) -> Self {
        self.answers.insert(server.to_string(), Answer::Slow(delay));
        self
    }

    /// How many queries `server` received.
    pub fn calls(&self, server: &str) -> usize {
        self.calls.lock().get(server).copied().unwrap_or(0)
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn block_at(
        &self,
        rpc_address: &str,
        height: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<BlockSummary, FetchError> {
        let url = format!("http://{}/block?height={}", rpc_address, height);
        *self.calls.lock().entry(rpc_address.to_string()).or_insert(0) += 1;

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled { url });
        }

        match self.answers.get(rpc_address) {
            Some(Answer::Block(block)) => Ok(block.clone()),
            Some(Answer::Slow(delay)) => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(FetchError::Cancelled { url }),
                    _ = tokio::time::sleep((*delay).min(timeout)) => Err(FetchError::Timeout {
                        url,
                        timeout_ms: timeout.as_millis() as u64,
                    }),
                }
            }
            None => Err(FetchError::Connection {
                url,
                reason: "connection refused".to_string(),
            }),
        }
    }
}
