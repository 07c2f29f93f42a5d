//! # Join Configuration
//!
//! Loaded from TOML, then overridden from the environment, then validated.
//!
//! ```toml
//! seed_ip = "198.51.100.7"
//! rpc_port = 26657
//! gateway_port = 11000
//! p2p_port = 26656
//! state_sync = true
//! discovery = "crawl"        # crawl | peer-list | none
//! join_timeout_secs = 300
//!
//! [crawler]
//! max_depth = 3
//! max_concurrency = 64
//!
//! [trust]
//! min_agreeing = 2
//!
//! [genesis]
//! call_timeout_secs = 40
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use vb_01_peer_crawler::CrawlerConfig;
use vb_02_trust_checkpoint::TrustConfig;
use vb_03_genesis_verifier::GenesisConfig;
use vb_http_client::FetcherConfig;

/// How seeds are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// Crawl the network through the gateway role.
    #[default]
    Crawl,
    /// Read the gateway's public peer list.
    PeerList,
    /// Use only the trusted seed.
    None,
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crawl => write!(f, "crawl"),
            Self::PeerList => write!(f, "peer-list"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for DiscoveryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crawl" => Ok(Self::Crawl),
            "peer-list" | "peer_list" | "peerlist" => Ok(Self::PeerList),
            "none" => Ok(Self::None),
            other => Err(ConfigError::Invalid(format!(
                "unknown discovery mode {:?} (expected crawl, peer-list or none)",
                other
            ))),
        }
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Environment variable holds an unusable value.
    #[error("Invalid value {value:?} for {var}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Configuration fails validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a join needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Trusted seed host.
    pub seed_ip: String,
    /// Consensus RPC port.
    pub rpc_port: u16,
    /// Gateway port.
    pub gateway_port: u16,
    /// P2P port used in seed strings.
    pub p2p_port: u16,
    /// Resolve a state-sync checkpoint.
    pub state_sync: bool,
    /// Seed discovery mode.
    pub discovery: DiscoveryMode,
    /// Deadline for the whole join in seconds.
    pub join_timeout_secs: u64,
    /// HTTP client settings.
    pub http: FetcherConfig,
    /// Crawler limits.
    pub crawler: CrawlerConfig,
    /// Checkpoint resolution.
    pub trust: TrustConfig,
    /// Genesis retrieval.
    pub genesis: GenesisConfig,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            seed_ip: String::new(),
            rpc_port: 26657,
            gateway_port: 11000,
            p2p_port: 26656,
            state_sync: false,
            discovery: DiscoveryMode::Crawl,
            join_timeout_secs: 300,
            http: FetcherConfig::default(),
            crawler: CrawlerConfig::default(),
            trust: TrustConfig::default(),
            genesis: GenesisConfig::default(),
        }
    }
}

impl JoinConfig {
    /// Default config pointed at `seed_ip`.
    pub fn for_seed(seed_ip: impl Into<String>) -> Self {
        Self {
            seed_ip: seed_ip.into(),
            ..Self::default()
        }
    }

    /// Create a config for testing (short timeouts).
    pub fn for_testing(seed_ip: impl Into<String>) -> Self {
        Self {
            seed_ip: seed_ip.into(),
            join_timeout_secs: 10,
            crawler: CrawlerConfig::for_testing(),
            trust: TrustConfig::for_testing(),
            genesis: GenesisConfig::for_testing(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys keep defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `VB_SEED_IP`, `VB_RPC_PORT`, `VB_GATEWAY_PORT`, `VB_P2P_PORT`
    /// - `VB_STATE_SYNC` (`true`/`false`/`1`/`0`)
    /// - `VB_DISCOVERY` (`crawl`/`peer-list`/`none`)
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ip) = lookup("VB_SEED_IP") {
            self.seed_ip = ip.trim().to_string();
        }
        if let Some(port) = port_var(&lookup, "VB_RPC_PORT")? {
            self.rpc_port = port;
        }
        if let Some(port) = port_var(&lookup, "VB_GATEWAY_PORT")? {
            self.gateway_port = port;
        }
        if let Some(port) = port_var(&lookup, "VB_P2P_PORT")? {
            self.p2p_port = port;
        }
        if let Some(value) = lookup("VB_STATE_SYNC") {
            self.state_sync = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Env {
                        var: "VB_STATE_SYNC",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("VB_DISCOVERY") {
            self.discovery = value.parse().map_err(|_| ConfigError::Env {
                var: "VB_DISCOVERY",
                value,
            })?;
        }
        Ok(())
    }

    /// Reject configurations a join cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_ip.trim().is_empty() {
            return Err(ConfigError::Invalid("seed_ip is empty".into()));
        }
        for (name, port) in [
            ("rpc_port", self.rpc_port),
            ("gateway_port", self.gateway_port),
            ("p2p_port", self.p2p_port),
        ] {
            if port == 0 {
                return Err(ConfigError::Invalid(format!("{} is 0", name)));
            }
        }
        if self.crawler.max_concurrency == 0 || self.trust.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be at least 1".into()));
        }
        if self.crawler.max_nodes == 0 {
            return Err(ConfigError::Invalid("crawler.max_nodes must be at least 1".into()));
        }
        if self.trust.min_agreeing < 2 {
            return Err(ConfigError::Invalid(format!(
                "trust.min_agreeing is {}, must be at least 2",
                self.trust.min_agreeing
            )));
        }
        if self.join_timeout_secs == 0 {
            return Err(ConfigError::Invalid("join_timeout_secs is 0".into()));
        }
        Ok(())
    }

    /// Whole-join deadline.
    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }
}

fn port_var<F>(lookup: &F, var: &'static str) -> Result<Option<u16>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(Some(port)),
            _ => Err(ConfigError::Env { var, value }),
        },
    }
}
