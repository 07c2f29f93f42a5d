//! # Address Parsing
//!
//! Seeds travel as `tcp://<node_id>@<host>:<port>`; peers advertise their
//! listen address as `tcp://<ip>:<port>`. Both come from untrusted peers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Scheme prefix used by seed and listen address strings.
pub const TCP_SCHEME: &str = "tcp://";

/// Address parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Seed string has no `<id>@` part.
    #[error("seed {0:?} has no node id")]
    MissingNodeId(String),

    /// No `:port` suffix.
    #[error("address {0:?} has no port")]
    MissingPort(String),

    /// Port is not a number in 1..=65535.
    #[error("address {0:?} has an invalid port")]
    InvalidPort(String),

    /// Host part is empty or contains forbidden characters.
    #[error("address {0:?} has an invalid host")]
    InvalidHost(String),

    /// Not an `ip:port` socket address.
    #[error("{0:?} is not an ip:port socket address")]
    InvalidSocketAddr(String),
}

fn strip_scheme(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed.strip_prefix(TCP_SCHEME).unwrap_or(trimmed)
}

/// Split `host:port` (optionally `tcp://`-prefixed, IPv6 in brackets).
pub fn parse_host_port(input: &str) -> Result<(String, u16), AddressError> {
    let raw = strip_scheme(input);
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| AddressError::MissingPort(input.to_string()))?;

    let port: u16 = port
        .parse()
        .map_err(|_| AddressError::InvalidPort(input.to_string()))?;
    if port == 0 {
        return Err(AddressError::InvalidPort(input.to_string()));
    }

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    let forbidden = |c: char| c.is_whitespace() || matches!(c, '@' | '/' | '[' | ']');
    if host.is_empty() || host.contains(forbidden) {
        return Err(AddressError::InvalidHost(input.to_string()));
    }

    Ok((host.to_string(), port))
}

/// Parse an advertised listen address into a socket address.
///
/// Unlike [`parse_host_port`], the host must be a literal IP.
pub fn parse_listen_addr(input: &str) -> Result<SocketAddr, AddressError> {
    strip_scheme(input)
        .parse::<SocketAddr>()
        .map_err(|_| AddressError::InvalidSocketAddr(input.to_string()))
}

/// A parsed seed address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeedAddress {
    /// Node identity.
    pub node_id: String,
    /// Host (IP literal or hostname, without brackets).
    pub host: String,
    /// P2P port.
    pub port: u16,
}

impl SeedAddress {
    /// Create a seed address.
    pub fn new(node_id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            node_id: node_id.into(),
            host: host.into(),
            port,
        }
    }

    /// Parse `[tcp://]<id>@<host>:<port>`.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let raw = strip_scheme(input);
        let (node_id, host_port) = raw
            .split_once('@')
            .ok_or_else(|| AddressError::MissingNodeId(input.to_string()))?;
        if node_id.is_empty() || node_id.contains(char::is_whitespace) {
            return Err(AddressError::MissingNodeId(input.to_string()));
        }
        let (host, port) = parse_host_port(host_port)?;
        Ok(Self::new(node_id, host, port))
    }

    /// `host:port` with the port swapped, e.g. the RPC address of a P2P seed.
    pub fn with_port(&self, port: u16) -> String {
        format_host_port(&self.host, port)
    }
}

impl FromStr for SeedAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SeedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}@{}",
            TCP_SCHEME,
            self.node_id,
            format_host_port(&self.host, self.port)
        )
    }
}

fn format_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
