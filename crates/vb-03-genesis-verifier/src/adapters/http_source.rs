//! # HTTP Genesis Source
//!
//! | Call | Path |
//! |------|------|
//! | chunk | `rpc:/genesis_chunked?chunk=N` |
//! | document | `gateway:/api/genesis` |
//! | checksum | `gateway:/api/gensum` |

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_http_client::{endpoint, HttpFetcher};
use vb_shared_types::FetchError;

use crate::domain::GenesisChunk;
use crate::ports::{GenesisEndpoints, GenesisSource};

#[derive(Deserialize)]
struct ChunkEnvelope {
    result: WireChunk,
}

#[serde_as]
#[derive(Deserialize)]
struct WireChunk {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    chunk: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    total: u64,
    data: String,
}

#[derive(Deserialize)]
struct WireChecksum {
    checksum: String,
}

/// [`GenesisSource`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpGenesisSource {
    fetcher: HttpFetcher,
}

impl HttpGenesisSource {
    /// Create a source. The fetcher's body cap applies to each response,
    /// so pass one sized for genesis documents.
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl GenesisSource for HttpGenesisSource {
    async fn genesis_chunk(
        &self,
        endpoints: &GenesisEndpoints,
        index: u64,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<GenesisChunk, FetchError> {
        let url = endpoint(
            &endpoints.ip,
            endpoints.rpc_port,
            &format!("genesis_chunked?chunk={}", index),
        );
        let envelope: ChunkEnvelope = self.fetcher.get_json(&url, timeout, cancel).await?;
        Ok(GenesisChunk {
            chunk: envelope.result.chunk,
            total: envelope.result.total,
            data: envelope.result.data,
        })
    }

    async fn gateway_genesis(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let url = endpoint(&endpoints.ip, endpoints.gateway_port, "api/genesis");
        self.fetcher.get_bytes(&url, timeout, cancel).await
    }

    async fn genesis_checksum(
        &self,
        endpoints: &GenesisEndpoints,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let url = endpoint(&endpoints.ip, endpoints.gateway_port, "api/gensum");
        let body: WireChecksum = self.fetcher.get_json(&url, timeout, cancel).await?;
        Ok(body.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_http_client::FetcherConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> HttpGenesisSource {
        HttpGenesisSource::new(HttpFetcher::new(&FetcherConfig::default()).unwrap())
    }

    fn endpoints(server: &MockServer) -> GenesisEndpoints {
        let addr = server.address();
        GenesisEndpoints::new(addr.ip().to_string(), addr.port(), addr.port())
    }

    #[tokio::test]
    async fn test_chunk_accepts_string_and_number_counters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genesis_chunked"))
            .and(query_param("chunk", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"chunk": "0", "total": 2, "data": "eyJh"}
            })))
            .mount(&server)
            .await;

        let chunk = source()
            .genesis_chunk(
                &endpoints(&server),
                0,
                Duration::from_secs(2),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            chunk,
            GenesisChunk {
                chunk: 0,
                total: 2,
                data: "eyJh".into()
            }
        );
    }

    #[tokio::test]
    async fn test_checksum_and_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/gensum"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"checksum": "0xab"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/genesis"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"chain_id":"testnet-1"}"#))
            .mount(&server)
            .await;

        let ends = endpoints(&server);
        let cancel = CancellationToken::new();
        let src = source();
        assert_eq!(
            src.genesis_checksum(&ends, Duration::from_secs(2), &cancel)
                .await
                .unwrap(),
            "0xab"
        );
        assert_eq!(
            src.gateway_genesis(&ends, Duration::from_secs(2), &cancel)
                .await
                .unwrap(),
            br#"{"chain_id":"testnet-1"}"#.to_vec()
        );
    }
}
