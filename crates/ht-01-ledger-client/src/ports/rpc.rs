//! # LedgerRpc Port (Driven)
//!
//! The transport interface the client requires against the ledger network.
//!
//! Production: `HttpLedgerRpc` (adapters/http.rs)
//! Testing/demo: `InMemoryLedger` (adapters/memory.rs)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_types::{EvalError, ResolveError, SubmitError};

/// Placement proof for one committed transaction.
#[derive(Debug, Clone)]
pub struct TxProof {
    /// Height of the containing block.
    pub block_number: u64,
    /// Ledger validation code (0 = valid).
    pub validation_code: i32,
    /// Hash of the containing block, when reported.
    pub block_hash: Option<String>,
    /// Raw transaction payload as stored on the ledger.
    pub payload: Vec<u8>,
    /// Commit instant as recorded by the ledger.
    pub timestamp: DateTime<Utc>,
}

/// Abstract RPC interface to the ledger network.
///
/// Implementations carry the channel and chaincode binding; the client
/// passes only function names and ordered string arguments.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Broadcast a transaction through the endorsement/ordering path and
    /// block until commit (or failure) is observed.
    ///
    /// `transaction_id` is derived by the caller before broadcast; the
    /// network commits the transaction under exactly this identifier.
    async fn submit(
        &self,
        transaction_id: &str,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, SubmitError>;

    /// Evaluate a read-only transaction on a single peer. No ordering, no
    /// commit.
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, EvalError>;

    /// Look up the block placement of a committed transaction.
    async fn query_transaction(&self, transaction_id: &str) -> Result<TxProof, ResolveError>;

    /// Lightweight liveness probe. Must not error; failures degrade to
    /// `false`.
    async fn ping(&self) -> bool;
}
