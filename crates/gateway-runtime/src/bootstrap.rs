//! Process bootstrap: builds the store objects and service graph, owns
//! their lifecycle, and injects handles downward. No module-level mutable
//! state anywhere in the stack.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ht_01_ledger_client::{
    DevelopmentEnrollment, HttpLedgerRpc, LedgerClient, Wallet,
};
use ht_02_tx_gateway::TransactionGateway;
use ht_03_provenance::BatchProjector;

use crate::config::RuntimeConfig;

/// Build and initialize the full gateway stack.
///
/// Returns the gateway handle; the reachability probe task is already
/// running. Startup connectivity failures are absorbed by the gateway's
/// fallback policy and never fail the bootstrap.
pub async fn bootstrap(config: &RuntimeConfig) -> Result<Arc<TransactionGateway>> {
    let wallet = Wallet::open(&config.wallet_dir)
        .with_context(|| format!("opening wallet at {}", config.wallet_dir.display()))?;
    let enrollment =
        DevelopmentEnrollment::new(config.profile.own_organization().msp_id.clone());
    let identity = wallet
        .load_or_enroll(&config.identity_label, &enrollment)
        .context("loading signing identity")?;

    let rpc = Arc::new(
        HttpLedgerRpc::new(&config.profile, config.gateway.query_timeout())
            .context("building ledger transport")?,
    );
    let client = Arc::new(
        LedgerClient::new(config.profile.clone(), rpc).context("building ledger client")?,
    );
    let projector = Arc::new(BatchProjector::new());

    let gateway = Arc::new(
        TransactionGateway::new(config.gateway.clone(), client, projector)
            .context("building transaction gateway")?,
    );

    gateway.initialize(identity).await;
    gateway.spawn_probe();

    let health = gateway.health();
    info!(
        connected = health.connected,
        reachable = health.reachable,
        "gateway stack ready"
    );

    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_survives_unreachable_network() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.wallet_dir = dir.path().join("wallet");
        // Nothing listens on these ports; bootstrap must still come up in
        // fallback-eligible state rather than fail.
        for (i, org) in config.profile.organizations.iter_mut().enumerate() {
            org.peer.url = format!("http://127.0.0.1:{}", i + 1);
        }

        let gateway = bootstrap(&config).await.unwrap();
        let health = gateway.health();
        assert!(!health.connected);
        assert!(!health.reachable);
    }

    #[tokio::test]
    async fn test_bootstrap_enrolls_identity_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.wallet_dir = dir.path().join("wallet");
        for (i, org) in config.profile.organizations.iter_mut().enumerate() {
            org.peer.url = format!("http://127.0.0.1:{}", i + 1);
        }

        bootstrap(&config).await.unwrap();
        assert!(config.wallet_dir.join("admin.id").exists());
        bootstrap(&config).await.unwrap();
    }
}
