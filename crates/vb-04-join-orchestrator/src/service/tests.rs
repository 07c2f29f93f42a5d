use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vb_01_peer_crawler::testing::StaticTopology;
use vb_02_trust_checkpoint::testing::MockBlockSource;
use vb_03_genesis_verifier::testing::MockGenesisSource;
use vb_03_genesis_verifier::GenesisError;
use vb_shared_types::{FetchError, QueryKind};

use super::*;
use crate::config::{DiscoveryMode, JoinConfig};
use crate::domain::JoinError;
use crate::testing::{mock_ports, MockPeerList, RecordingInitializer};

const SEED: &str = "198.51.100.7";
const GENESIS: &[u8] = br#"{"chain_id":"testnet-1","initial_height":"1"}"#;

fn seed_network(peers: &[&str]) -> StaticTopology {
    StaticTopology::new()
        .with_node(SEED, peers)
        .with_status(SEED, "N1", "testnet-1", "1000")
}

fn orchestrator_with(
    config: JoinConfig,
    network: StaticTopology,
    peer_list: MockPeerList,
    blocks: MockBlockSource,
    genesis: MockGenesisSource,
) -> JoinOrchestrator {
    let ports = mock_ports(
        Arc::new(network),
        Arc::new(peer_list),
        blocks,
        Arc::new(genesis),
    );
    JoinOrchestrator::new(config, ports)
}

fn orchestrator(config: JoinConfig, network: StaticTopology) -> JoinOrchestrator {
    orchestrator_with(
        config,
        network,
        MockPeerList::default(),
        MockBlockSource::new(),
        MockGenesisSource::serving(GENESIS, 2),
    )
}

#[tokio::test]
async fn test_unreachable_peer_falls_back_to_trusted_seed() {
    let join = orchestrator(JoinConfig::for_testing(SEED), seed_network(&["203.0.113.4"]));
    let cancel = CancellationToken::new();

    let discovery = join.discover(&cancel).await.unwrap();
    let report = discovery.crawl.unwrap();
    assert!(report.topology.is_empty());
    let entry = &report.blacklist["203.0.113.4"];
    assert_eq!(entry.errors.len(), 2);
    let kinds: Vec<QueryKind> = entry.errors.iter().map(|f| f.query).collect();
    assert!(kinds.contains(&QueryKind::NetInfo));
    assert!(kinds.contains(&QueryKind::Status));

    let network = join.network_info(&cancel).await.unwrap();
    assert_eq!(network.network_name, "testnet-1");
    assert_eq!(network.node_id, "N1");
    assert_eq!(network.block_height, "1000");
    assert_eq!(network.seeds, vec!["tcp://N1@198.51.100.7:26656".to_string()]);
}

#[tokio::test]
async fn test_crawl_discovery_builds_sorted_seeds() {
    let network = seed_network(&["10.0.0.3", "10.0.0.2"])
        .with_node("10.0.0.2", &[SEED])
        .with_node("10.0.0.3", &[]);
    let join = orchestrator(JoinConfig::for_testing(SEED), network);

    let network = join.network_info(&CancellationToken::new()).await.unwrap();
    assert_eq!(
        network.seeds,
        vec![
            "tcp://N1@198.51.100.7:26656".to_string(),
            "tcp://node-10-0-0-2@10.0.0.2:26656".to_string(),
            "tcp://node-10-0-0-3@10.0.0.3:26656".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_peer_list_discovery() {
    let mut config = JoinConfig::for_testing(SEED);
    config.discovery = DiscoveryMode::PeerList;
    let join = orchestrator_with(
        config,
        seed_network(&[]),
        MockPeerList::serving("b@10.0.0.2:26656\n\na@10.0.0.1:26656\ngarbage\n"),
        MockBlockSource::new(),
        MockGenesisSource::serving(GENESIS, 1),
    );

    let network = join.network_info(&CancellationToken::new()).await.unwrap();
    assert_eq!(
        network.seeds,
        vec![
            "tcp://a@10.0.0.1:26656".to_string(),
            "tcp://b@10.0.0.2:26656".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_peer_list_failure_falls_back() {
    let mut config = JoinConfig::for_testing(SEED);
    config.discovery = DiscoveryMode::PeerList;
    let join = orchestrator_with(
        config,
        seed_network(&[]),
        MockPeerList::failing(FetchError::Status {
            url: "http://198.51.100.7:11000/api/pub_p2p_list".into(),
            status: 404,
        }),
        MockBlockSource::new(),
        MockGenesisSource::serving(GENESIS, 1),
    );

    let network = join.network_info(&CancellationToken::new()).await.unwrap();
    assert_eq!(network.seeds, vec!["tcp://N1@198.51.100.7:26656".to_string()]);
}

#[tokio::test]
async fn test_no_discovery_uses_seed_only() {
    let mut config = JoinConfig::for_testing(SEED);
    config.discovery = DiscoveryMode::None;
    let network = seed_network(&["10.0.0.2"]).with_node("10.0.0.2", &[]);
    let join = orchestrator(config, network);

    let discovery = join.discover(&CancellationToken::new()).await.unwrap();
    assert!(discovery.seeds.is_empty());
    assert!(discovery.crawl.is_none());

    let network = join.network_info(&CancellationToken::new()).await.unwrap();
    assert_eq!(network.seeds, vec!["tcp://N1@198.51.100.7:26656".to_string()]);
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let join = orchestrator(JoinConfig::for_testing(SEED), StaticTopology::new());
    let err = join.network_info(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, JoinError::SeedStatus { ref seed, .. } if seed == "198.51.100.7:26657"));
}

#[tokio::test]
async fn test_join_without_state_sync() {
    let join = orchestrator(JoinConfig::for_testing(SEED), seed_network(&[]));
    let initializer = RecordingInitializer::new();

    let bootstrap = join.join(&initializer).await.unwrap();
    assert_eq!(bootstrap.genesis.as_bytes(), GENESIS);
    assert!(bootstrap.sync_checkpoint.is_none());
    assert!(bootstrap.state_sync_settings().is_none());
    assert_eq!(bootstrap.p2p_seeds(), "tcp://N1@198.51.100.7:26656");

    let received = initializer.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].network, bootstrap.network);
}

#[tokio::test]
async fn test_join_with_state_sync_checkpoint() {
    let mut config = JoinConfig::for_testing(SEED);
    config.state_sync = true;
    let network = seed_network(&["10.0.0.2", "10.0.0.3"])
        .with_node("10.0.0.2", &[])
        .with_node("10.0.0.3", &[]);
    let blocks = MockBlockSource::new()
        .with_block("10.0.0.2:26657", 1000, "AAAA")
        .with_block("10.0.0.3:26657", 1000, "AAAA")
        .with_block("198.51.100.7:26657", 1000, "BBBB");
    let join = orchestrator_with(
        config,
        network,
        MockPeerList::default(),
        blocks,
        MockGenesisSource::serving(GENESIS, 3),
    );

    let bootstrap = join.join(&RecordingInitializer::new()).await.unwrap();
    let settings = bootstrap.state_sync_settings().unwrap();
    assert_eq!(settings.rpc_servers, "10.0.0.2:26657,10.0.0.3:26657");
    assert_eq!(settings.trust_height, 1000);
    assert_eq!(settings.trust_hash, "AAAA");
    assert_eq!(settings.trust_period, "168h0m0s");
}

#[tokio::test]
async fn test_state_sync_without_quorum_stays_off() {
    let mut config = JoinConfig::for_testing(SEED);
    config.state_sync = true;
    let blocks = MockBlockSource::new().with_block("198.51.100.7:26657", 1000, "AAAA");
    let join = orchestrator_with(
        config,
        seed_network(&[]),
        MockPeerList::default(),
        blocks,
        MockGenesisSource::serving(GENESIS, 1),
    );

    let bootstrap = join.join(&RecordingInitializer::new()).await.unwrap();
    assert!(bootstrap.state_sync_enabled);
    assert!(bootstrap.sync_checkpoint.is_none());
    assert!(bootstrap.state_sync_settings().is_none());
}

#[tokio::test]
async fn test_non_numeric_height_is_fatal_with_state_sync() {
    let mut config = JoinConfig::for_testing(SEED);
    config.state_sync = true;
    let network = StaticTopology::new()
        .with_node(SEED, &[])
        .with_status(SEED, "N1", "testnet-1", "latest");
    let join = orchestrator(config, network);

    let err = join.join(&RecordingInitializer::new()).await.unwrap_err();
    assert!(matches!(err, JoinError::InvalidBlockHeight(ref h) if h == "latest"));
}

#[tokio::test]
async fn test_non_numeric_height_ignored_without_state_sync() {
    let network = StaticTopology::new()
        .with_node(SEED, &[])
        .with_status(SEED, "N1", "testnet-1", "latest");
    let join = orchestrator(JoinConfig::for_testing(SEED), network);
    assert!(join.join(&RecordingInitializer::new()).await.is_ok());
}

#[tokio::test]
async fn test_genesis_checksum_mismatch_is_fatal() {
    let initializer = RecordingInitializer::new();
    let join = orchestrator_with(
        JoinConfig::for_testing(SEED),
        seed_network(&[]),
        MockPeerList::default(),
        MockBlockSource::new(),
        MockGenesisSource::serving(GENESIS, 2).with_checksum("0xdeadbeef"),
    );

    let err = join.join(&initializer).await.unwrap_err();
    assert!(matches!(
        err,
        JoinError::Genesis(GenesisError::Sha256ChecksumMismatch { .. })
    ));
    assert!(initializer.received().is_empty());
}

#[tokio::test]
async fn test_initializer_failure_is_reported() {
    let join = orchestrator(JoinConfig::for_testing(SEED), seed_network(&[]));
    let err = join
        .join(&RecordingInitializer::failing("disk full"))
        .await
        .unwrap_err();
    assert!(matches!(err, JoinError::Initializer(_)));
    assert!(err.to_string().contains("disk full"));
}

#[tokio::test]
async fn test_cancelled_join() {
    let join = orchestrator(JoinConfig::for_testing(SEED), seed_network(&[]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = join
        .join_with_cancel(&RecordingInitializer::new(), cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_join_deadline() {
    let mut config = JoinConfig::for_testing(SEED);
    config.join_timeout_secs = 1;
    config.crawler.call_timeout_ms = 600_000;
    let network = seed_network(&[]).with_delay(Duration::from_secs(30));
    let join = orchestrator(config, network);

    let err = join.join(&RecordingInitializer::new()).await.unwrap_err();
    assert!(matches!(err, JoinError::Timeout { secs: 1 }));
}
