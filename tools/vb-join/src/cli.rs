//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vb_04_join_orchestrator::{DiscoveryMode, JoinConfig};

/// vb-join: bootstrap a validator from one trusted seed
#[derive(Parser, Debug)]
#[command(name = "vb-join", version)]
#[command(about = "Discover peers, resolve a trust checkpoint and fetch a verified genesis")]
pub struct Cli {
    /// Emit JSON logs
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Log level or EnvFilter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full join and write genesis.json and bootstrap.json
    Join(JoinArgs),
    /// Crawl the network and print topology and blacklist as JSON
    Crawl(CrawlArgs),
    /// Resolve a trust checkpoint from explicit RPC servers
    Checkpoint(CheckpointArgs),
    /// Fetch and verify the genesis of one node
    Genesis(GenesisArgs),
}

/// `vb-join join`
#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Trusted seed host (overrides the config file and VB_SEED_IP)
    #[arg(long)]
    pub seed_ip: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resolve a state-sync checkpoint
    #[arg(long)]
    pub state_sync: bool,

    /// Seed discovery mode: crawl, peer-list or none
    #[arg(long)]
    pub discovery: Option<DiscoveryMode>,

    /// Consensus RPC port
    #[arg(long)]
    pub rpc_port: Option<u16>,

    /// Gateway port
    #[arg(long)]
    pub gateway_port: Option<u16>,

    /// P2P port used in seed strings
    #[arg(long)]
    pub p2p_port: Option<u16>,

    /// Directory receiving genesis.json and bootstrap.json
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl JoinArgs {
    /// Flags win over environment and file.
    pub fn apply(&self, config: &mut JoinConfig) {
        if let Some(ip) = &self.seed_ip {
            config.seed_ip = ip.trim().to_string();
        }
        if self.state_sync {
            config.state_sync = true;
        }
        if let Some(mode) = self.discovery {
            config.discovery = mode;
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(port) = self.gateway_port {
            config.gateway_port = port;
        }
        if let Some(port) = self.p2p_port {
            config.p2p_port = port;
        }
    }
}

/// `vb-join crawl`
#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Seed host
    #[arg(long)]
    pub seed_ip: String,

    /// Port to probe (gateway role unless --rpc)
    #[arg(long, default_value_t = 11000)]
    pub port: u16,

    /// Use the consensus RPC endpoints instead of the gateway
    #[arg(long)]
    pub rpc: bool,

    /// Maximum crawl depth
    #[arg(long, default_value_t = 3)]
    pub depth: usize,

    /// Expand regardless of depth
    #[arg(long)]
    pub ignore_depth: bool,
}

/// `vb-join checkpoint`
#[derive(Args, Debug)]
pub struct CheckpointArgs {
    /// Candidate RPC server (`host:port`), repeatable
    #[arg(long = "rpc", required = true)]
    pub rpc_servers: Vec<String>,

    /// Target block height
    #[arg(long)]
    pub height: u64,
}

/// `vb-join genesis`
#[derive(Args, Debug)]
pub struct GenesisArgs {
    /// Node host
    #[arg(long)]
    pub ip: String,

    /// Consensus RPC port
    #[arg(long, default_value_t = 26657)]
    pub rpc_port: u16,

    /// Gateway port
    #[arg(long, default_value_t = 11000)]
    pub gateway_port: u16,

    /// Also write the verified document here
    #[arg(long)]
    pub out: Option<PathBuf>,
}
