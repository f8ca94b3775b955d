//! The two-variant ledger backend capability.
//!
//! Selected once at initialization and injected into every call path, so
//! call sites stay backend-agnostic and origin tagging is enforced by
//! construction rather than by convention: only the fallback variant can
//! mint `Origin::Fallback` results, and it can mint nothing else.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use ht_01_ledger_client::LedgerClient;
use shared_types::{BlockRef, Origin, QueryResult, TxResult};

/// Which ledger the gateway is currently talking to.
#[derive(Clone)]
pub enum LedgerBackend {
    /// A live connection to the real network.
    Real(Arc<LedgerClient>),
    /// The local synthesizer, active only under the demo fallback policy.
    Fallback(Arc<FallbackLedger>),
}

/// Synthesizes clearly non-authoritative results while the network is down.
///
/// Identifiers carry a `fallback-` prefix and block numbers are always
/// `BlockRef::Estimated`; nothing this type produces can be mistaken for a
/// ledger record.
#[derive(Debug, Default)]
pub struct FallbackLedger;

impl FallbackLedger {
    /// A fresh synthesizer.
    pub fn new() -> Self {
        Self
    }

    /// Synthesize a submission result.
    pub fn synthesize_invoke(&self, function: &str) -> TxResult {
        let now = Utc::now();
        TxResult {
            transaction_id: format!("fallback-{}", Uuid::new_v4().simple()),
            block: BlockRef::Estimated(now.timestamp().max(0) as u64),
            payload: serde_json::to_vec(&serde_json::json!({
                "status": "fallback",
                "function": function,
            }))
            .unwrap_or_default(),
            timestamp: now,
            origin: Origin::Fallback,
        }
    }

    /// Synthesize a query result.
    pub fn synthesize_query(&self, function: &str) -> QueryResult {
        QueryResult {
            payload: serde_json::to_vec(&serde_json::json!({
                "status": "fallback",
                "function": function,
                "data": serde_json::Value::Null,
            }))
            .unwrap_or_default(),
            timestamp: Utc::now(),
            origin: Origin::Fallback,
        }
    }
}
