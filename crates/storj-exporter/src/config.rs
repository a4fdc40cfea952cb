//! Exporter configuration.
//!
//! Settings are read once at startup, from command-line flags with the
//! `STORJ_*` environment variables as fallbacks. The collector list is a
//! space-separated string (`"payout sat"`) for compatibility with existing
//! container deployments.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

/// Optional collection stages enabled by `STORJ_COLLECTORS`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collectors {
    /// `payout`: fetch the estimated payout for the current month
    pub payout: bool,
    /// `sat`: fetch per-satellite detail (daily bandwidth, storage, audits)
    pub satellites: bool,
    /// Unrecognized tokens, reported once logging is up
    pub ignored: Vec<String>,
}

impl Collectors {
    /// Every optional stage enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            payout: true,
            satellites: true,
            ignored: Vec::new(),
        }
    }
}

impl FromStr for Collectors {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut collectors = Collectors::default();
        for token in s.split_whitespace() {
            match token {
                "payout" => collectors.payout = true,
                "sat" => collectors.satellites = true,
                other => collectors.ignored.push(other.to_string()),
            }
        }
        Ok(collectors)
    }
}

/// Command-line arguments for the exporter binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "storj-exporter", version, about = "Prometheus exporter for Storj storage nodes")]
pub struct Config {
    /// Storage node API host
    #[arg(long, env = "STORJ_HOST_ADDRESS", default_value = "127.0.0.1")]
    pub host_address: String,

    /// Storage node API port
    #[arg(long, env = "STORJ_API_PORT", default_value_t = 14002)]
    pub api_port: u16,

    /// Space-separated list of optional collectors (payout, sat)
    #[arg(long, env = "STORJ_COLLECTORS", default_value = "payout sat")]
    pub collectors: Collectors,

    /// Address the metrics server binds to
    #[arg(long, env = "STORJ_EXPORTER_ADDRESS", default_value = "0.0.0.0")]
    pub listen_address: IpAddr,

    /// Port the metrics server listens on
    #[arg(long, env = "STORJ_EXPORTER_PORT", default_value_t = 9651)]
    pub exporter_port: u16,

    /// Timeout for each node API request (e.g. "10s", "500ms")
    #[arg(long, env = "STORJ_API_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Base URL of the node operator API, with trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api/", self.host_address, self.api_port)
    }

    /// Socket address of the metrics server.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.exporter_port)
    }
}
