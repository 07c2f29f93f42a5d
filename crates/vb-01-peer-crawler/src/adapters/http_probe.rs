//! HTTP node probe for the two endpoint families a node exposes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_http_client::{endpoint, HttpFetcher};
use vb_shared_types::FetchError;

use super::wire::{RpcEnvelope, WireNetInfo, WireStatus};
use crate::domain::{NetInfo, NodeStatus};
use crate::ports::NodeProbe;

/// Which endpoint family to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeRole {
    /// Node RPC: `/net_info`, `/status`, wrapped in `result`.
    Rpc,
    /// Gateway: `/api/net_info`, `/api/status`, unwrapped.
    Gateway,
}

impl ProbeRole {
    fn net_info_path(self) -> &'static str {
        match self {
            Self::Rpc => "/net_info",
            Self::Gateway => "/api/net_info",
        }
    }

    fn status_path(self) -> &'static str {
        match self {
            Self::Rpc => "/status",
            Self::Gateway => "/api/status",
        }
    }
}

/// [`NodeProbe`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNodeProbe {
    fetcher: HttpFetcher,
    role: ProbeRole,
}

impl HttpNodeProbe {
    /// Probe node RPC endpoints.
    pub fn rpc(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            role: ProbeRole::Rpc,
        }
    }

    /// Probe gateway endpoints.
    pub fn gateway(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            role: ProbeRole::Gateway,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        match self.role {
            ProbeRole::Rpc => self
                .fetcher
                .get_json::<RpcEnvelope<T>>(url, timeout, cancel)
                .await
                .map(|env| env.result),
            ProbeRole::Gateway => self.fetcher.get_json::<T>(url, timeout, cancel).await,
        }
    }
}

#[async_trait]
impl NodeProbe for HttpNodeProbe {
    async fn net_info(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NetInfo, FetchError> {
        let url = endpoint(host, port, self.role.net_info_path());
        self.get::<WireNetInfo>(&url, timeout, cancel)
            .await
            .map(NetInfo::from)
    }

    async fn status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<NodeStatus, FetchError> {
        let url = endpoint(host, port, self.role.status_path());
        let status = self
            .get::<WireStatus>(&url, timeout, cancel)
            .await
            .map(NodeStatus::from)?;
        if status.node_id.is_empty() {
            return Err(FetchError::malformed(url, "status has an empty node id"));
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_http_client::FetcherConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetcherConfig::default()).unwrap()
    }

    fn host_port(server: &MockServer) -> (String, u16) {
        let addr = server.address();
        (addr.ip().to_string(), addr.port())
    }

    #[tokio::test]
    async fn test_rpc_probe_unwraps_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/net_info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "result": {
                    "n_peers": "1",
                    "peers": [{
                        "node_info": {"id": "aa", "listen_addr": "tcp://203.0.113.4:26656"},
                        "remote_ip": "203.0.113.4"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let (host, port) = host_port(&server);
        let info = HttpNodeProbe::rpc(fetcher())
            .net_info(&host, port, Duration::from_secs(2), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(info.n_peers, 1);
        assert_eq!(info.peers[0].remote_ip, "203.0.113.4");
        assert_eq!(info.peers[0].node_id, "aa");
    }

    #[tokio::test]
    async fn test_gateway_probe_reads_bare_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "node_info": {"id": "bb", "network": "testnet-1", "listen_addr": "tcp://0.0.0.0:26656"},
                "sync_info": {"latest_block_height": "4242"}
            })))
            .mount(&server)
            .await;

        let (host, port) = host_port(&server);
        let status = HttpNodeProbe::gateway(fetcher())
            .status(&host, port, Duration::from_secs(2), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(status.node_id, "bb");
        assert_eq!(status.network, "testnet-1");
        assert_eq!(status.latest_block_height, "4242");
    }

    #[tokio::test]
    async fn test_empty_node_id_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"node_info": {"id": ""}}
            })))
            .mount(&server)
            .await;

        let (host, port) = host_port(&server);
        let err = HttpNodeProbe::rpc(fetcher())
            .status(&host, port, Duration::from_secs(2), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_rpc_probe_rejects_bare_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/net_info"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"n_peers": 0})),
            )
            .mount(&server)
            .await;

        let (host, port) = host_port(&server);
        let err = HttpNodeProbe::rpc(fetcher())
            .net_info(&host, port, Duration::from_secs(2), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }
}
