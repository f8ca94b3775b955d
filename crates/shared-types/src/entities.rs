//! # Core Domain Entities
//!
//! Defines the custody-stage model, result envelopes, and audit records
//! shared across the gateway crates.
//!
//! ## Clusters
//!
//! - **Custody**: `Stage`, the four stage sub-records, `Batch`, `BatchSummary`
//! - **Ledger Results**: `Origin`, `BlockRef`, `AcceptedTx`, `TxResult`,
//!   `QueryResult`, `RawTransaction`
//! - **Audit**: `TransactionRecord`, `TxStatus`, `HealthReport`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: CUSTODY STAGES
// =============================================================================

/// One of the four ordered custody stages a batch moves through.
///
/// The order is fixed: collection → quality → processing → manufacturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Field collection of the raw herb.
    Collection,
    /// Laboratory quality attestation.
    Quality,
    /// Custody transfer into processing.
    Processing,
    /// Final product manufacturing (terminal stage).
    Manufacturing,
}

impl Stage {
    /// All stages in custody order.
    pub const ALL: [Stage; 4] = [
        Stage::Collection,
        Stage::Quality,
        Stage::Processing,
        Stage::Manufacturing,
    ];

    /// The chaincode function that records this stage.
    pub fn function_name(&self) -> &'static str {
        match self {
            Stage::Collection => "RecordCollectionEvent",
            Stage::Quality => "QualityAttestation",
            Stage::Processing => "TransferCustody",
            Stage::Manufacturing => "BatchCreation",
        }
    }

    /// Map a chaincode function name to the stage it records.
    pub fn for_function(function: &str) -> Option<Stage> {
        match function {
            "RecordCollectionEvent" => Some(Stage::Collection),
            "QualityAttestation" => Some(Stage::Quality),
            "TransferCustody" => Some(Stage::Processing),
            "BatchCreation" => Some(Stage::Manufacturing),
            _ => None,
        }
    }

    /// The stage that must be complete before this one may be recorded.
    pub fn required_prior(&self) -> Option<Stage> {
        match self {
            Stage::Collection => None,
            Stage::Quality => Some(Stage::Collection),
            Stage::Processing => Some(Stage::Quality),
            Stage::Manufacturing => Some(Stage::Processing),
        }
    }

    /// Lowercase label used in summaries and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Collection => "collection",
            Stage::Quality => "quality",
            Stage::Processing => "processing",
            Stage::Manufacturing => "manufacturing",
        }
    }

    /// Zero-based position in the custody order.
    pub fn position(&self) -> usize {
        match self {
            Stage::Collection => 0,
            Stage::Quality => 1,
            Stage::Processing => 2,
            Stage::Manufacturing => 3,
        }
    }
}

/// Collection event payload, recorded by `RecordCollectionEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    /// Botanical species of the collected herb.
    pub species: String,
    /// Collected weight in grams.
    pub weight: f64,
    /// Collection site latitude.
    pub latitude: f64,
    /// Collection site longitude.
    pub longitude: f64,
    /// When the collection took place.
    pub timestamp: DateTime<Utc>,
    /// Collector identifier, when the submitter supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_id: Option<String>,
}

/// Quality attestation payload, recorded by `QualityAttestation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRecord {
    /// Moisture content (percent).
    pub moisture: f64,
    /// Pesticide residue level (ppm).
    pub pesticides: f64,
    /// Heavy metal level (ppm).
    pub heavy_metals: f64,
    /// Whether the batch passed attestation.
    pub passed: bool,
    /// When the tests were run.
    pub test_date: DateTime<Utc>,
    /// Lab technician identifier, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_tech_id: Option<String>,
}

/// Processing payload, recorded by `TransferCustody`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingRecord {
    /// Processing method (drying, grinding, extraction, ...).
    pub method: String,
    /// Process temperature in °C.
    pub temperature: f64,
    /// Process duration in hours.
    pub duration: f64,
    /// Output yield relative to input (percent).
    #[serde(rename = "yield")]
    pub yield_percent: f64,
    /// When the processing completed.
    pub process_date: DateTime<Utc>,
    /// Processor identifier, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_id: Option<String>,
}

/// Manufacturing payload, recorded by `BatchCreation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingRecord {
    /// Finished product name.
    pub product_name: String,
    /// Number of units in the manufactured batch.
    pub batch_size: f64,
    /// Product expiry date.
    pub expiry_date: DateTime<Utc>,
    /// When the batch was manufactured.
    pub manufacturing_date: DateTime<Utc>,
    /// Manufacturer identifier, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<String>,
}

/// The per-batch provenance aggregate maintained by the projector.
///
/// Each stage sub-record is immutable once written: a replayed stage
/// function for the same batch is an idempotent no-op, never an update.
/// `completed_steps` always lists exactly the populated sub-records, in
/// custody order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Unique batch identifier (externally assigned or generated).
    pub batch_id: String,
    /// Collection stage record, once recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionRecord>,
    /// Quality stage record, once recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityRecord>,
    /// Processing stage record, once recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<ProcessingRecord>,
    /// Manufacturing stage record, once recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturing: Option<ManufacturingRecord>,
    /// Completed stages in custody order.
    pub completed_steps: Vec<Stage>,
    /// Instant of the most recent accepted stage write.
    pub last_updated: DateTime<Utc>,
}

impl Batch {
    /// Create an empty batch aggregate.
    pub fn new(batch_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            batch_id: batch_id.into(),
            collection: None,
            quality: None,
            processing: None,
            manufacturing: None,
            completed_steps: Vec::new(),
            last_updated: now,
        }
    }

    /// Whether the given stage has been recorded.
    pub fn has_stage(&self, stage: Stage) -> bool {
        match stage {
            Stage::Collection => self.collection.is_some(),
            Stage::Quality => self.quality.is_some(),
            Stage::Processing => self.processing.is_some(),
            Stage::Manufacturing => self.manufacturing.is_some(),
        }
    }

    /// The most recently completed stage, if any.
    pub fn current_stage(&self) -> Option<Stage> {
        self.completed_steps.last().copied()
    }

    /// Whether all four stages are complete (terminal state).
    pub fn is_terminal(&self) -> bool {
        self.completed_steps.len() == Stage::ALL.len()
    }
}

/// Compact batch view for listing endpoints, newest-updated first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Batch identifier.
    pub batch_id: String,
    /// Species from the collection record, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Most recently completed stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,
    /// Number of completed stages.
    pub completed_steps: usize,
    /// Total number of custody stages.
    pub total_steps: usize,
    /// Instant of the most recent accepted stage write.
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// CLUSTER B: LEDGER RESULTS
// =============================================================================

/// Distinguishes an authoritative ledger-confirmed result from a locally
/// synthesized fallback result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Confirmed by the ledger network.
    Real,
    /// Synthesized locally while the ledger was unreachable.
    Fallback,
}

impl Origin {
    /// Whether this result was confirmed by the ledger network.
    pub fn is_real(&self) -> bool {
        matches!(self, Origin::Real)
    }
}

/// A block number together with how it was obtained.
///
/// `Resolved` carries the number the ledger actually reported for the
/// transaction. `Estimated` carries a best-effort Unix-seconds heuristic
/// used when resolution failed or the result was synthesized; consumers
/// must treat it as non-authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum BlockRef {
    /// The ledger reported this block number for the transaction.
    Resolved(u64),
    /// Best-effort estimate; resolution failed or never ran.
    Estimated(u64),
}

impl BlockRef {
    /// The carried block number, regardless of provenance.
    pub fn number(&self) -> u64 {
        match self {
            BlockRef::Resolved(n) | BlockRef::Estimated(n) => *n,
        }
    }

    /// Whether the number is an estimate rather than a ledger-reported value.
    pub fn is_estimated(&self) -> bool {
        matches!(self, BlockRef::Estimated(_))
    }
}

/// Block metadata returned by transaction resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    /// Height of the block containing the transaction.
    pub block_number: u64,
    /// Ledger validation code for the transaction (0 = valid).
    pub validation_code: i32,
    /// Hash of the containing block, when the ledger reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
}

/// A transaction the ledger has accepted and committed, before its block
/// placement has been resolved.
#[derive(Debug, Clone)]
pub struct AcceptedTx {
    /// Ledger-assigned transaction identifier (derived before broadcast).
    pub transaction_id: String,
    /// Chaincode response payload.
    pub payload: Vec<u8>,
    /// Commit observation instant.
    pub timestamp: DateTime<Utc>,
}

/// The uniform result envelope for a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    /// Opaque transaction identifier, unique across the ledger's lifetime.
    pub transaction_id: String,
    /// Resolved or estimated block placement.
    pub block: BlockRef,
    /// Chaincode response payload.
    #[serde(with = "payload_bytes")]
    pub payload: Vec<u8>,
    /// Commit observation instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the result is ledger-confirmed or synthesized.
    pub origin: Origin,
}

/// The uniform result envelope for an evaluated (read-only) transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Query response payload.
    #[serde(with = "payload_bytes")]
    pub payload: Vec<u8>,
    /// Evaluation instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the result is ledger-confirmed or synthesized.
    pub origin: Origin,
}

impl QueryResult {
    /// Decode the payload as JSON, for callers that know the chaincode
    /// returns a JSON document.
    pub fn payload_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Full ledger record for one transaction, including placement metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Transaction identifier.
    pub transaction_id: String,
    /// Height of the containing block.
    pub block_number: u64,
    /// Ledger validation code (0 = valid).
    pub validation_code: i32,
    /// Raw transaction payload.
    #[serde(with = "payload_bytes")]
    pub payload: Vec<u8>,
    /// Commit instant.
    pub timestamp: DateTime<Utc>,
    /// Ledger network name.
    pub network: String,
    /// Channel the transaction was committed on.
    pub channel: String,
    /// Chaincode that produced the transaction.
    pub chaincode: String,
}

// =============================================================================
// CLUSTER C: AUDIT
// =============================================================================

/// Outcome recorded for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// The submission was accepted.
    Success,
}

/// One entry in the append-only transaction audit log.
///
/// Written once by the gateway on each accepted submission, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Transaction identifier.
    pub id: String,
    /// Chaincode function that was invoked.
    pub function: String,
    /// Batch the submission addressed.
    pub batch_id: String,
    /// Submitted arguments, in order.
    pub args: Vec<String>,
    /// Commit observation instant.
    pub timestamp: DateTime<Utc>,
    /// Resolved or estimated block placement.
    pub block: BlockRef,
    /// Submission outcome.
    pub status: TxStatus,
    /// Whether the record is ledger-confirmed or synthesized.
    pub origin: Origin,
}

/// Aggregate gateway health view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Whether a live ledger connection is established.
    pub connected: bool,
    /// Latest reachability probe result.
    pub reachable: bool,
    /// Total accepted submissions since start (or last reset).
    pub total_transactions: usize,
    /// Number of batches with at least one recorded stage.
    pub active_batches: usize,
    /// Instant of the most recent accepted submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction_at: Option<DateTime<Utc>>,
}

/// Serialize payload bytes as a UTF-8 string where possible (chaincode
/// responses are JSON text), falling back lossily otherwise.
mod payload_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.into_bytes())
    }
}
