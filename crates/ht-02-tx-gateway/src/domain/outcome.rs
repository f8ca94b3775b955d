//! Result envelope for accepted invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_types::{BlockRef, Origin, TxResult};

/// What a successful `invoke` hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeOutcome {
    /// Batch the submission addressed (generated when the caller supplied
    /// none).
    pub batch_id: String,
    /// Transaction identifier.
    pub transaction_id: String,
    /// Resolved or estimated block placement.
    pub block: BlockRef,
    /// Commit observation instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the result is ledger-confirmed or synthesized.
    pub origin: Origin,
}

impl InvokeOutcome {
    /// Build the outcome from a result envelope and the batch it addressed.
    pub fn from_result(batch_id: impl Into<String>, result: &TxResult) -> Self {
        Self {
            batch_id: batch_id.into(),
            transaction_id: result.transaction_id.clone(),
            block: result.block,
            timestamp: result.timestamp,
            origin: result.origin,
        }
    }
}
