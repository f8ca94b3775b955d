//! Gateway configuration with validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the gateway does while the ledger is unreachable.
///
/// `Strict` is the only policy fit for production: no transaction is
/// recorded and callers receive an explicit unavailable error. `Demo`
/// synthesizes origin-tagged results for demonstration deployments and must
/// never be the silent default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Reject with `ServiceUnavailable` while disconnected.
    #[default]
    Strict,
    /// Serve synthesized, origin-tagged results while disconnected.
    Demo,
}

/// Main gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Fallback policy while the ledger is unreachable.
    pub fallback: FallbackPolicy,
    /// Maximum time to wait for a commit before failing a submission.
    pub commit_timeout_secs: u64,
    /// Timeout for read-only queries against a peer.
    pub query_timeout_secs: u64,
    /// Interval of the background reachability probe.
    pub probe_interval_secs: u64,
    /// Prefix for generated batch identifiers.
    pub batch_id_prefix: String,
    /// Seed the demonstration baseline batch at bootstrap and after reset.
    pub seed_demo_batches: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::Strict,
            commit_timeout_secs: 30,
            query_timeout_secs: 10,
            probe_interval_secs: 15,
            batch_id_prefix: "HERB".to_string(),
            seed_demo_batches: false,
        }
    }
}

impl GatewayConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commit_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "commit_timeout_secs cannot be 0".into(),
            ));
        }
        if self.query_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "query_timeout_secs cannot be 0".into(),
            ));
        }
        if self.probe_interval_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "probe_interval_secs cannot be 0".into(),
            ));
        }
        if self.batch_id_prefix.is_empty() {
            return Err(ConfigError::Invalid("batch_id_prefix is empty".into()));
        }
        Ok(())
    }

    /// Commit timeout as a `Duration`.
    pub fn commit_timeout(&self) -> Duration {
        Duration::from_secs(self.commit_timeout_secs)
    }

    /// Query timeout as a `Duration`.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Probe interval as a `Duration`.
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid timeout value.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
