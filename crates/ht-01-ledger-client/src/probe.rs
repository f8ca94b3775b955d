//! Periodic reachability probe.
//!
//! The only background task the gateway stack spawns. It pings the network
//! on a fixed interval and publishes the result into a shared flag; it
//! never mutates connection or batch state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::ports::rpc::LedgerRpc;

/// Shared view of the latest probe result.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityProbe {
    flag: Arc<AtomicBool>,
}

impl ReachabilityProbe {
    /// A probe that has not observed the network yet (reports unreachable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest observed reachability.
    pub fn is_reachable(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Run one probe immediately and record the result.
    pub async fn refresh(&self, rpc: &dyn LedgerRpc) -> bool {
        let up = rpc.ping().await;
        self.flag.store(up, Ordering::Relaxed);
        up
    }

    /// Spawn the periodic probe task.
    pub fn spawn(&self, rpc: Arc<dyn LedgerRpc>, interval: Duration) -> JoinHandle<()> {
        let flag = Arc::clone(&self.flag);
        tokio::spawn(async move {
            loop {
                let up = rpc.ping().await;
                let was_up = flag.swap(up, Ordering::Relaxed);
                if up && !was_up {
                    info!("ledger network reachable");
                } else if !up && was_up {
                    warn!("ledger network unreachable");
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}
