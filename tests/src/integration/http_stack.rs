//! # HTTP Stack
//!
//! The real adapters against one wiremock server playing both roles of a
//! node (RPC and gateway on the same port).

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde_json::{json, Value};
    use sha2::{Digest, Sha256};
    use tokio_util::sync::CancellationToken;
    use vb_03_genesis_verifier::GenesisError;
    use vb_04_join_orchestrator::{FileNodeInitializer, JoinConfig, JoinError, JoinOrchestrator};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn genesis_doc() -> Value {
        json!({
            "genesis_time": "2024-01-01T00:00:00Z",
            "chain_id": "testnet-1",
            "initial_height": "1",
            "validators": []
        })
    }

    async fn mount_json(server: &MockServer, at: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// A node that peers only with itself. With `checksum_reachable` unset the
    /// server fails verification on drop if the checksum is requested.
    async fn single_node(
        gateway_genesis: Value,
        checksum: Option<String>,
        checksum_reachable: bool,
    ) -> (MockServer, Vec<u8>) {
        let server = MockServer::start().await;
        let ip = server.address().ip().to_string();
        let listen = format!("tcp://{}:26656", ip);
        let document = serde_json::to_vec(&genesis_doc()).unwrap();

        mount_json(
            &server,
            "/status",
            json!({"result": {
                "node_info": {"id": "N1", "network": "testnet-1", "listen_addr": listen},
                "sync_info": {"latest_block_height": "1000"}
            }}),
        )
        .await;
        mount_json(
            &server,
            "/api/status",
            json!({
                "node_info": {"id": "N1", "network": "testnet-1", "listen_addr": listen},
                "sync_info": {"latest_block_height": 1000}
            }),
        )
        .await;
        mount_json(
            &server,
            "/api/net_info",
            json!({
                "n_peers": "1",
                "peers": [{"node_info": {"id": "N1", "listen_addr": listen}, "remote_ip": ip}]
            }),
        )
        .await;
        mount_json(
            &server,
            "/block",
            json!({"result": {
                "block_id": {"hash": "AB12"},
                "block": {"header": {"height": "1000"}}
            }}),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/genesis_chunked"))
            .and(query_param("chunk", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {
                "chunk": "0",
                "total": "1",
                "data": STANDARD.encode(&document)
            }})))
            .mount(&server)
            .await;
        mount_json(&server, "/api/genesis", gateway_genesis).await;

        let checksum =
            checksum.unwrap_or_else(|| format!("0x{}", hex::encode(Sha256::digest(&document))));
        let gensum = Mock::given(method("GET"))
            .and(path("/api/gensum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "checksum": checksum })));
        if checksum_reachable {
            gensum.mount(&server).await;
        } else {
            gensum.expect(0).named("gensum").mount(&server).await;
        }

        (server, document)
    }

    fn config_for(server: &MockServer) -> JoinConfig {
        let addr = server.address();
        let mut config = JoinConfig::for_testing(addr.ip().to_string());
        config.rpc_port = addr.port();
        config.gateway_port = addr.port();
        config.crawler.call_timeout_ms = 2000;
        config.trust.call_timeout_ms = 2000;
        config
    }

    #[tokio::test]
    async fn test_join_over_http_with_enveloped_gateway_genesis() {
        let (server, document) = single_node(json!({ "genesis": genesis_doc() }), None, true).await;
        let mut config = config_for(&server);
        config.state_sync = true;
        let ip = server.address().ip().to_string();

        let dir = tempfile::tempdir().unwrap();
        let join = JoinOrchestrator::http(config).unwrap();
        let bootstrap = join
            .join(&FileNodeInitializer::new(dir.path()))
            .await
            .unwrap();

        assert_eq!(bootstrap.network.node_id, "N1");
        assert_eq!(bootstrap.network.seeds, vec![format!("tcp://N1@{}:26656", ip)]);
        // One RPC server cannot form a quorum.
        assert!(bootstrap.sync_checkpoint.is_none());
        assert_eq!(bootstrap.genesis.as_bytes(), document.as_slice());
        assert_eq!(
            std::fs::read(dir.path().join("genesis.json")).unwrap(),
            document
        );
    }

    #[tokio::test]
    async fn test_bare_gateway_genesis_accepted() {
        let (server, document) = single_node(genesis_doc(), None, true).await;
        let join = JoinOrchestrator::http(config_for(&server)).unwrap();
        let bootstrap = join.prepare(&CancellationToken::new()).await.unwrap();
        assert_eq!(bootstrap.genesis.len(), document.len());
    }

    #[tokio::test]
    async fn test_gateway_content_mismatch_skips_checksum() {
        let mut other = genesis_doc();
        other["chain_id"] = json!("testnet-2");
        let (node, _) = single_node(other, None, false).await;

        let join = JoinOrchestrator::http(config_for(&node)).unwrap();
        let err = join.prepare(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            JoinError::Genesis(GenesisError::FilesContentNotIdentical)
        ));
    }

    #[tokio::test]
    async fn test_wrong_published_checksum_is_fatal() {
        let (server, _) = single_node(genesis_doc(), Some("0xDEADBEEF".to_string()), true).await;
        let join = JoinOrchestrator::http(config_for(&server)).unwrap();
        let err = join.prepare(&CancellationToken::new()).await.unwrap_err();
        match err {
            JoinError::Genesis(GenesisError::Sha256ChecksumMismatch { expected, .. }) => {
                assert_eq!(expected.to_lowercase(), "deadbeef");
            }
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
    }
}
