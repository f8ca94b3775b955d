//! Runtime configuration.
//!
//! Sane defaults with environment overrides, prefixed `HT_`:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HT_HTTP_HOST` | `0.0.0.0` | HTTP bind address |
//! | `HT_HTTP_PORT` | `5000` | HTTP port |
//! | `HT_WALLET_DIR` | `./wallet` | Identity wallet directory |
//! | `HT_IDENTITY_LABEL` | `admin` | Wallet label of the signing identity |
//! | `HT_FALLBACK_POLICY` | `strict` | `strict` or `demo` |
//! | `HT_SEED_DEMO_BATCHES` | `false` | Seed the demonstration batch |
//! | `HT_COMMIT_TIMEOUT_SECS` | `30` | Submit commit timeout |
//! | `HT_PROBE_INTERVAL_SECS` | `15` | Reachability probe interval |
//! | `HT_PEER_URL` | profile default | Override the endorsing peer URL |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ht_01_ledger_client::ConnectionProfile;
use ht_02_tx_gateway::{FallbackPolicy, GatewayConfig};

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 5000,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// HTTP server settings.
    pub http: HttpConfig,
    /// Gateway policy and timeouts.
    pub gateway: GatewayConfig,
    /// Ledger network topology.
    pub profile: ConnectionProfile,
    /// Identity wallet directory.
    pub wallet_dir: PathBuf,
    /// Wallet label of the signing identity.
    pub identity_label: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            gateway: GatewayConfig::default(),
            profile: ConnectionProfile::default(),
            wallet_dir: PathBuf::from("./wallet"),
            identity_label: "admin".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overlaid with `HT_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(host) = env_parse("HT_HTTP_HOST") {
            config.http.host = host;
        }
        if let Some(port) = env_parse("HT_HTTP_PORT") {
            config.http.port = port;
        }
        if let Ok(dir) = std::env::var("HT_WALLET_DIR") {
            config.wallet_dir = PathBuf::from(dir);
        }
        if let Ok(label) = std::env::var("HT_IDENTITY_LABEL") {
            config.identity_label = label;
        }
        if let Ok(policy) = std::env::var("HT_FALLBACK_POLICY") {
            config.gateway.fallback = match policy.to_lowercase().as_str() {
                "demo" => FallbackPolicy::Demo,
                _ => FallbackPolicy::Strict,
            };
        }
        if let Some(seed) = env_parse("HT_SEED_DEMO_BATCHES") {
            config.gateway.seed_demo_batches = seed;
        }
        if let Some(secs) = env_parse("HT_COMMIT_TIMEOUT_SECS") {
            config.gateway.commit_timeout_secs = secs;
        }
        if let Some(secs) = env_parse("HT_PROBE_INTERVAL_SECS") {
            config.gateway.probe_interval_secs = secs;
        }
        if let Ok(url) = std::env::var("HT_PEER_URL") {
            if let Some(own) = config.profile.organizations.first_mut() {
                own.peer.url = url;
            }
        }

        config
    }

    /// HTTP bind address.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
