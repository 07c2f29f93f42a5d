//! # vb-join
//!
//! Operator entry point for the validator bootstrap.
//!
//! ```text
//! vb-join join --seed-ip 198.51.100.7 --state-sync --out-dir ./node
//! vb-join crawl --seed-ip 198.51.100.7 --depth 2
//! vb-join checkpoint --rpc 10.0.0.1:26657 --rpc 10.0.0.2:26657 --height 1000
//! vb-join genesis --ip 198.51.100.7
//! ```
//!
//! Ctrl+C cancels whatever is in flight.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cli::{CheckpointArgs, Cli, Command, CrawlArgs, GenesisArgs, JoinArgs};
use vb_01_peer_crawler::{CrawlerConfig, HttpNodeProbe, NetworkCrawler, ScanRequest};
use vb_02_trust_checkpoint::{HttpBlockSource, TrustCheckpointResolver, TrustConfig};
use vb_03_genesis_verifier::{GenesisConfig, GenesisVerifier, HttpGenesisSource};
use vb_04_join_orchestrator::{FileNodeInitializer, JoinConfig, JoinOrchestrator};
use vb_http_client::{FetcherConfig, HttpFetcher};
use vb_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    if cli.json_logs {
        telemetry = telemetry.with_json_logs(true);
    }
    let _guard = init_telemetry(telemetry).context("initializing logging")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match cli.command {
        Command::Join(args) => join(args, cancel).await,
        Command::Crawl(args) => crawl(args, cancel).await,
        Command::Checkpoint(args) => checkpoint(args, cancel).await,
        Command::Genesis(args) => genesis(args, cancel).await,
    }
}

fn fetcher() -> Result<HttpFetcher> {
    HttpFetcher::new(&FetcherConfig::default()).context("building HTTP client")
}

async fn join(args: JoinArgs, cancel: CancellationToken) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => JoinConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => JoinConfig::default(),
    };
    config.apply_env().context("reading environment overrides")?;
    args.apply(&mut config);
    config.validate().context("validating configuration")?;

    let orchestrator = JoinOrchestrator::http(config).context("setting up join")?;
    let initializer = FileNodeInitializer::new(&args.out_dir);
    let bootstrap = orchestrator
        .join_with_cancel(&initializer, cancel)
        .await
        .context("join failed")?;

    info!(
        "Joined {} with {} seeds; state-sync {}",
        bootstrap.network.network_name,
        bootstrap.network.seeds.len(),
        if bootstrap.state_sync_settings().is_some() { "enabled" } else { "disabled" }
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&bootstrap.manifest()).context("encoding summary")?
    );
    Ok(())
}

async fn crawl(args: CrawlArgs, cancel: CancellationToken) -> Result<()> {
    let fetcher = fetcher()?;
    let probe = if args.rpc {
        HttpNodeProbe::rpc(fetcher)
    } else {
        HttpNodeProbe::gateway(fetcher)
    };
    let crawler = NetworkCrawler::new(probe, CrawlerConfig::default());

    let mut request = ScanRequest::new(args.seed_ip, args.port, args.depth);
    request.ignore_depth = args.ignore_depth;
    let report = crawler
        .scan_with_cancel(request, cancel)
        .await
        .context("crawl failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("encoding crawl report")?
    );
    Ok(())
}

async fn checkpoint(args: CheckpointArgs, cancel: CancellationToken) -> Result<()> {
    let resolver = TrustCheckpointResolver::new(HttpBlockSource::new(fetcher()?), TrustConfig::default());
    let checkpoint = resolver
        .resolve(&args.rpc_servers, args.height, &cancel)
        .await
        .context("checkpoint resolution failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&checkpoint).context("encoding checkpoint")?
    );
    Ok(())
}

async fn genesis(args: GenesisArgs, cancel: CancellationToken) -> Result<()> {
    let config = GenesisConfig::default();
    let fetcher = fetcher()?.with_body_limit(config.max_body_bytes);
    let verifier = GenesisVerifier::new(HttpGenesisSource::new(fetcher), config);
    let genesis = verifier
        .get_verified_genesis(&args.ip, args.rpc_port, args.gateway_port, &cancel)
        .await
        .context("genesis verification failed")?;

    if let Some(path) = &args.out {
        tokio::fs::write(path, genesis.as_bytes())
            .await
            .with_context(|| format!("writing {}", path.display()))?;
    }
    println!("{}  {} bytes", genesis.sha256(), genesis.len());
    Ok(())
}
