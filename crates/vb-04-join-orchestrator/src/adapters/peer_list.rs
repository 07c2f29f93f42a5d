//! Gateway `GET /api/pub_p2p_list?peers_only=true`.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_http_client::{endpoint, HttpFetcher};
use vb_shared_types::FetchError;

use crate::ports::PeerListSource;

/// HTTP [`PeerListSource`].
#[derive(Debug, Clone)]
pub struct HttpPeerListSource {
    fetcher: HttpFetcher,
}

impl HttpPeerListSource {
    /// Wrap a fetcher.
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PeerListSource for HttpPeerListSource {
    async fn pub_p2p_list(
        &self,
        ip: &str,
        gateway_port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let url = endpoint(ip, gateway_port, "api/pub_p2p_list?peers_only=true");
        self.fetcher.get_text(&url, timeout, cancel).await
    }
}
