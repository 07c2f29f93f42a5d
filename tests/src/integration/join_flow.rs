//! # Join Flow (in-memory)
//!
//! The orchestrator over mock ports: crawl with an unreachable peer, the
//! trusted-seed fallback, and a state-sync join written to disk.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use vb_01_peer_crawler::testing::StaticTopology;
    use vb_01_peer_crawler::{CrawlerConfig, NetworkCrawler};
    use vb_02_trust_checkpoint::testing::MockBlockSource;
    use vb_03_genesis_verifier::testing::MockGenesisSource;
    use vb_04_join_orchestrator::testing::{mock_ports, MockPeerList, RecordingInitializer};
    use vb_04_join_orchestrator::{
        BootstrapManifest, FileNodeInitializer, JoinConfig, JoinOrchestrator,
    };
    use vb_shared_types::QueryKind;

    const SEED: &str = "198.51.100.7";
    const GENESIS: &[u8] = br#"{"chain_id":"testnet-1","validators":[]}"#;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn lone_seed_with_dead_peer() -> StaticTopology {
        StaticTopology::new()
            .with_node(SEED, &["203.0.113.4"])
            .with_status(SEED, "N1", "testnet-1", "1000")
    }

    fn orchestrator(
        config: JoinConfig,
        network: Arc<StaticTopology>,
        blocks: MockBlockSource,
    ) -> JoinOrchestrator {
        let ports = mock_ports(
            network,
            Arc::new(MockPeerList::default()),
            blocks,
            Arc::new(MockGenesisSource::serving(GENESIS, 4)),
        );
        JoinOrchestrator::new(config, ports)
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_dead_peer_is_blacklisted_and_seed_is_used() {
        let network = Arc::new(lone_seed_with_dead_peer());

        let crawler = NetworkCrawler::from_arc(network.clone(), CrawlerConfig::for_testing());
        let report = crawler.scan(SEED, 11000, 3, false).await.unwrap();
        assert!(report.topology.is_empty());
        assert_eq!(report.blacklist.len(), 1);
        let entry = &report.blacklist["203.0.113.4"];
        assert_eq!(entry.errors.len(), 2);
        assert_eq!(entry.errors[0].query, QueryKind::NetInfo);
        assert_eq!(entry.errors[1].query, QueryKind::Status);
        assert!(report.is_disjoint());

        let join = orchestrator(JoinConfig::for_testing(SEED), network, MockBlockSource::new());
        let info = join.network_info(&CancellationToken::new()).await.unwrap();
        assert_eq!(info.node_id, "N1");
        assert_eq!(info.network_name, "testnet-1");
        assert_eq!(info.block_height(), Some(1000));
        assert_eq!(info.seeds, vec!["tcp://N1@198.51.100.7:26656".to_string()]);
    }

    #[tokio::test]
    async fn test_join_once_per_ip_across_branches() {
        // 10.0.0.4 is reachable through a shallow and a deep branch.
        let network = Arc::new(
            StaticTopology::new()
                .with_node(SEED, &["10.0.0.2", "10.0.0.3"])
                .with_status(SEED, "N1", "testnet-1", "1000")
                .with_node("10.0.0.2", &["10.0.0.4"])
                .with_node("10.0.0.3", &["10.0.0.5"])
                .with_node("10.0.0.5", &["10.0.0.4"])
                .with_node("10.0.0.4", &[]),
        );

        let join = orchestrator(
            JoinConfig::for_testing(SEED),
            network.clone(),
            MockBlockSource::new(),
        );
        let discovery = join.discover(&CancellationToken::new()).await.unwrap();
        assert_eq!(network.net_info_calls("10.0.0.4"), 1);
        assert_eq!(discovery.seeds.len(), 4);
        assert!(discovery
            .seeds
            .contains(&"tcp://node-10-0-0-4@10.0.0.4:26656".to_string()));
    }

    #[tokio::test]
    async fn test_state_sync_join_writes_bootstrap_files() {
        let network = Arc::new(
            StaticTopology::new()
                .with_node(SEED, &["10.0.0.2", "10.0.0.3", "10.0.0.4"])
                .with_status(SEED, "N1", "testnet-1", "1000")
                .with_node("10.0.0.2", &[])
                .with_node("10.0.0.3", &[])
                .with_node("10.0.0.4", &[]),
        );
        let blocks = MockBlockSource::new()
            .with_block("10.0.0.2:26657", 1000, "AB12")
            .with_block("10.0.0.3:26657", 1000, "AB12")
            .with_block("10.0.0.4:26657", 1000, "FFFF");

        let mut config = JoinConfig::for_testing(SEED);
        config.state_sync = true;
        let join = orchestrator(config, network, blocks);

        let dir = tempfile::tempdir().unwrap();
        let bootstrap = join
            .join(&FileNodeInitializer::new(dir.path()))
            .await
            .unwrap();

        let checkpoint = bootstrap.sync_checkpoint.clone().unwrap();
        assert_eq!(
            checkpoint.rpc_servers,
            vec!["10.0.0.2:26657".to_string(), "10.0.0.3:26657".to_string()]
        );
        assert_eq!(checkpoint.trust_hash, "AB12");

        let written = std::fs::read(dir.path().join("genesis.json")).unwrap();
        assert_eq!(written, GENESIS);

        let manifest: BootstrapManifest =
            serde_json::from_slice(&std::fs::read(dir.path().join("bootstrap.json")).unwrap())
                .unwrap();
        let state_sync = manifest.state_sync.unwrap();
        assert_eq!(state_sync.rpc_servers, "10.0.0.2:26657,10.0.0.3:26657");
        assert_eq!(state_sync.trust_height, 1000);
        assert_eq!(state_sync.trust_period, "168h0m0s");
        assert_eq!(state_sync.temp_dir, "/tmp");
        assert_eq!(manifest.p2p_seeds.split(',').count(), 3);
    }

    #[tokio::test]
    async fn test_repeated_joins_agree() {
        let network = Arc::new(
            StaticTopology::new()
                .with_node(SEED, &["10.0.0.2", "10.0.0.3"])
                .with_status(SEED, "N1", "testnet-1", "1000")
                .with_node("10.0.0.2", &["10.0.0.3"])
                .with_node("10.0.0.3", &[SEED]),
        );
        let join = orchestrator(JoinConfig::for_testing(SEED), network, MockBlockSource::new());

        let first = join.join(&RecordingInitializer::new()).await.unwrap();
        let second = join.join(&RecordingInitializer::new()).await.unwrap();
        assert_eq!(first.network, second.network);
        assert_eq!(first.genesis, second.genesis);
    }
}
