//! In-memory simulated ledger for tests and demonstration networks.
//!
//! Commits every submission into its own block with a monotonically
//! increasing height, keeps per-batch event history for `GetProvenance`,
//! and exposes toggles that let tests drive the failure paths: network
//! unreachability, endorsement rejection, and concealed block placement.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::json;

use shared_types::{EvalError, ResolveError, SubmitError};

use crate::ports::rpc::{LedgerRpc, TxProof};

#[derive(Debug, Clone)]
struct CommittedTx {
    block_number: u64,
    payload: Vec<u8>,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Deterministic in-memory `LedgerRpc` implementation.
#[derive(Default)]
pub struct InMemoryLedger {
    reachable: AtomicBool,
    endorsement_failure: Mutex<Option<String>>,
    conceal_placement: AtomicBool,
    height: AtomicU64,
    committed: RwLock<HashMap<String, CommittedTx>>,
    batch_events: RwLock<HashMap<String, Vec<serde_json::Value>>>,
}

impl InMemoryLedger {
    /// A reachable, empty ledger.
    pub fn new() -> Self {
        let ledger = Self::default();
        ledger.reachable.store(true, Ordering::SeqCst);
        ledger
    }

    /// Toggle simulated network reachability.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Make every subsequent submission fail endorsement with `reason`,
    /// or clear the failure with `None`.
    pub fn set_endorsement_failure(&self, reason: Option<&str>) {
        *self.endorsement_failure.lock() = reason.map(str::to_string);
    }

    /// Hide block placement so resolution reports transactions as not yet
    /// visible.
    pub fn conceal_placement(&self, conceal: bool) {
        self.conceal_placement.store(conceal, Ordering::SeqCst);
    }

    /// Current chain height.
    pub fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    /// Number of committed transactions.
    pub fn committed_count(&self) -> usize {
        self.committed.read().len()
    }
}

#[async_trait]
impl LedgerRpc for InMemoryLedger {
    async fn submit(
        &self,
        transaction_id: &str,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, SubmitError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(SubmitError::Transport("connection refused".into()));
        }
        if let Some(reason) = self.endorsement_failure.lock().clone() {
            return Err(SubmitError::EndorsementRejected(reason));
        }

        let block_number = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = Utc::now();

        let data: serde_json::Value = args
            .first()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| json!({}));

        if let Some(batch_id) = data.get("batchId").and_then(|v| v.as_str()) {
            self.batch_events
                .write()
                .entry(batch_id.to_string())
                .or_default()
                .push(json!({
                    "function": function,
                    "data": data,
                    "txId": transaction_id,
                    "blockNumber": block_number,
                }));
        }

        let payload = serde_json::to_vec(&json!({
            "status": "committed",
            "function": function,
            "txId": transaction_id,
        }))
        .unwrap_or_default();

        self.committed.write().insert(
            transaction_id.to_string(),
            CommittedTx {
                block_number,
                payload: payload.clone(),
                timestamp,
            },
        );

        Ok(payload)
    }

    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, EvalError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(EvalError::Transport("connection refused".into()));
        }

        match function {
            "GetProvenance" => {
                let batch_id = args
                    .first()
                    .ok_or_else(|| EvalError::QueryRejected("missing batch id".into()))?;
                let events = self
                    .batch_events
                    .read()
                    .get(batch_id)
                    .cloned()
                    .unwrap_or_default();
                serde_json::to_vec(&json!({
                    "batchId": batch_id,
                    "events": events,
                }))
                .map_err(|e| EvalError::Transport(e.to_string()))
            }
            other => Err(EvalError::QueryRejected(format!(
                "unknown function {}",
                other
            ))),
        }
    }

    async fn query_transaction(&self, transaction_id: &str) -> Result<TxProof, ResolveError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(ResolveError::Transport("connection refused".into()));
        }
        if self.conceal_placement.load(Ordering::SeqCst) {
            return Err(ResolveError::NotVisible(transaction_id.to_string()));
        }

        let committed = self.committed.read();
        let tx = committed
            .get(transaction_id)
            .ok_or_else(|| ResolveError::NotVisible(transaction_id.to_string()))?;

        Ok(TxProof {
            block_number: tx.block_number,
            validation_code: 0,
            block_hash: Some(format!("block-{:08x}", tx.block_number)),
            payload: tx.payload.clone(),
            timestamp: tx.timestamp,
        })
    }

    async fn ping(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
