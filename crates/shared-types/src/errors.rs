//! # Error Types
//!
//! Typed errors shared across the gateway crates. Connectivity failures at
//! startup are recovered into fallback-eligible state by the gateway;
//! per-call failures surface one of these to the immediate caller.

use thiserror::Error;

/// Errors establishing a ledger connection.
///
/// Fatal to that `connect` attempt, not to the process; the gateway treats
/// any of these as eligibility for fallback mode.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// No configured peer endpoint answered the probe.
    #[error("ledger network unreachable: {0}")]
    Unreachable(String),

    /// The signing identity could not be validated by the network.
    #[error("identity credential rejected: {0}")]
    CredentialRejected(String),

    /// The wallet could not supply or persist an identity.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// The connection profile is incomplete or inconsistent.
    #[error("invalid connection profile: {0}")]
    Profile(String),
}

/// Errors submitting a transaction through the endorsement/ordering path.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// No live connection; the caller must connect first.
    #[error("not connected to the ledger network")]
    NotConnected,

    /// An endorsing peer rejected the proposal.
    #[error("endorsement rejected: {0}")]
    EndorsementRejected(String),

    /// Commit was not observed within the caller-supplied timeout.
    /// The gateway never retries; a retry of a committed submit would
    /// double-record a stage.
    #[error("commit not observed within {timeout_secs}s")]
    CommitTimeout { timeout_secs: u64 },

    /// Transport-level failure talking to the network.
    #[error("ledger transport error: {0}")]
    Transport(String),
}

/// Errors evaluating a read-only transaction.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// No live connection; the caller must connect first.
    #[error("not connected to the ledger network")]
    NotConnected,

    /// The peer rejected the query.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    /// Transport-level failure talking to the network.
    #[error("ledger transport error: {0}")]
    Transport(String),
}

/// Errors resolving the block that contains a transaction.
///
/// Non-fatal by design: the gateway degrades to a marked estimate instead
/// of failing the submission.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The transaction is not (yet) visible on the ledger.
    #[error("transaction {0} not visible on the ledger")]
    NotVisible(String),

    /// The ledger reports the transaction as invalid.
    #[error("transaction {transaction_id} invalid (validation code {validation_code})")]
    InvalidTransaction {
        transaction_id: String,
        validation_code: i32,
    },

    /// Transport-level failure talking to the network.
    #[error("ledger transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by the transaction gateway to its callers.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The ledger is unreachable and fallback mode is disabled.
    /// Returned instead of a fabricated success; the caller must retry
    /// once the network is back.
    #[error("ledger network unavailable")]
    ServiceUnavailable,

    /// A submission failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A query failed.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// A transaction lookup failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The requested transaction is unknown to the ledger and the audit log.
    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    /// The caller supplied an unusable request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors interpreting an accepted transaction as a batch-state transition.
#[derive(Debug, Clone, Error)]
pub enum ProjectionError {
    /// The stage payload could not be decoded.
    #[error("invalid {function} payload: {reason}")]
    InvalidPayload { function: String, reason: String },
}
