//! The ledger client service: owns the process-wide connection and the
//! submit / evaluate / resolve paths.
//!
//! # Locking discipline
//!
//! The connection lives behind a `tokio::sync::RwLock`. `connect` and
//! `disconnect` take the write lock; `submit`, `evaluate`, and resolution
//! hold the read lock across their network await, so a disconnect waits for
//! in-flight calls while concurrent submissions on an established
//! connection proceed in parallel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_types::{AcceptedTx, BlockInfo, ConnectError, EvalError, ResolveError, SubmitError};

use crate::domain::identity::LedgerIdentity;
use crate::domain::profile::ConnectionProfile;
use crate::ports::rpc::{LedgerRpc, TxProof};

/// A live session to the ledger network.
#[derive(Debug)]
pub struct Connection {
    identity: LedgerIdentity,
    established_at: DateTime<Utc>,
}

impl Connection {
    /// The identity the session is bound to.
    pub fn identity(&self) -> &LedgerIdentity {
        &self.identity
    }

    /// When the session was established.
    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }
}

/// Client holding the single logical connection to the ledger network.
pub struct LedgerClient {
    profile: ConnectionProfile,
    rpc: Arc<dyn LedgerRpc>,
    conn: RwLock<Option<Connection>>,
}

impl LedgerClient {
    /// Build a client over the given transport. Validates the profile.
    pub fn new(profile: ConnectionProfile, rpc: Arc<dyn LedgerRpc>) -> Result<Self, ConnectError> {
        profile.validate()?;
        Ok(Self {
            profile,
            rpc,
            conn: RwLock::new(None),
        })
    }

    /// The network topology this client connects against.
    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    /// The underlying transport, shared with the reachability probe.
    pub fn rpc(&self) -> Arc<dyn LedgerRpc> {
        Arc::clone(&self.rpc)
    }

    /// Establish the connection, binding it to `identity`.
    ///
    /// Idempotent while a live connection exists: returns success without
    /// reconnecting.
    pub async fn connect(&self, identity: LedgerIdentity) -> Result<(), ConnectError> {
        let mut guard = self.conn.write().await;
        if guard.is_some() {
            debug!("connect called with live connection, keeping it");
            return Ok(());
        }

        if !self.rpc.ping().await {
            return Err(ConnectError::Unreachable(
                self.profile.own_organization().peer.url.clone(),
            ));
        }
        if identity.certificate.is_empty() || identity.private_key.is_empty() {
            return Err(ConnectError::CredentialRejected(
                "certificate or private key is empty".into(),
            ));
        }

        info!(
            network = %self.profile.network_name,
            channel = %self.profile.channel,
            chaincode = %self.profile.chaincode,
            msp_id = %identity.msp_id,
            "connected to ledger network"
        );
        *guard = Some(Connection {
            identity,
            established_at: Utc::now(),
        });
        Ok(())
    }

    /// Release the connection. Safe to call when already disconnected.
    pub async fn disconnect(&self) {
        let mut guard = self.conn.write().await;
        if guard.take().is_some() {
            info!("disconnected from ledger network");
        }
    }

    /// Whether a live connection exists.
    pub async fn is_connected(&self) -> bool {
        self.conn.read().await.is_some()
    }

    /// Liveness probe independent of the connection. Never errors.
    pub async fn is_reachable(&self) -> bool {
        self.rpc.ping().await
    }

    /// Submit a transaction and block until commit is observed, bounded by
    /// `commit_timeout`.
    ///
    /// The transaction identifier is derived locally before broadcast, so
    /// the returned [`AcceptedTx`] carries the exact id the ledger committed
    /// under. On timeout the operation fails with
    /// [`SubmitError::CommitTimeout`] and is never retried here: a retry of
    /// a submit that actually committed would double-record a stage.
    pub async fn submit(
        &self,
        function: &str,
        args: &[String],
        commit_timeout: Duration,
    ) -> Result<AcceptedTx, SubmitError> {
        let guard = self.conn.read().await;
        let conn = guard.as_ref().ok_or(SubmitError::NotConnected)?;

        let transaction_id = Self::derive_transaction_id(conn.identity());
        debug!(%transaction_id, function, "submitting transaction");

        // Cancel-safe up to this await; once the broadcast is in flight the
        // caller can only wait or time out.
        match tokio::time::timeout(commit_timeout, self.rpc.submit(&transaction_id, function, args))
            .await
        {
            Ok(Ok(payload)) => {
                debug!(%transaction_id, "commit observed");
                Ok(AcceptedTx {
                    transaction_id,
                    payload,
                    timestamp: Utc::now(),
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(%transaction_id, function, "commit not observed before timeout");
                Err(SubmitError::CommitTimeout {
                    timeout_secs: commit_timeout.as_secs(),
                })
            }
        }
    }

    /// Evaluate a read-only transaction and return the response bytes.
    pub async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, EvalError> {
        let guard = self.conn.read().await;
        if guard.is_none() {
            return Err(EvalError::NotConnected);
        }
        self.rpc.evaluate(function, args).await
    }

    /// Resolve the block containing `transaction_id`.
    ///
    /// Returns a distinguishable error when the transaction is invalid or
    /// not yet visible; the gateway substitutes a marked estimate in that
    /// case instead of failing the submission.
    pub async fn resolve_block(&self, transaction_id: &str) -> Result<BlockInfo, ResolveError> {
        let guard = self.conn.read().await;
        if guard.is_none() {
            return Err(ResolveError::Transport("not connected".into()));
        }

        let proof = self.rpc.query_transaction(transaction_id).await?;
        if proof.validation_code != 0 {
            return Err(ResolveError::InvalidTransaction {
                transaction_id: transaction_id.to_string(),
                validation_code: proof.validation_code,
            });
        }

        Ok(BlockInfo {
            block_number: proof.block_number,
            validation_code: proof.validation_code,
            block_hash: proof.block_hash,
        })
    }

    /// Full placement proof for a committed transaction, including invalid
    /// ones (the caller inspects the validation code).
    pub async fn transaction_proof(&self, transaction_id: &str) -> Result<TxProof, ResolveError> {
        let guard = self.conn.read().await;
        if guard.is_none() {
            return Err(ResolveError::Transport("not connected".into()));
        }
        self.rpc.query_transaction(transaction_id).await
    }

    /// Derive a ledger transaction identifier before broadcast: SHA-256
    /// over a fresh nonce and the signing certificate, hex encoded.
    fn derive_transaction_id(identity: &LedgerIdentity) -> String {
        let nonce = uuid::Uuid::new_v4();
        let mut hasher = Sha256::new();
        hasher.update(nonce.as_bytes());
        hasher.update(identity.certificate.as_bytes());
        hex::encode(hasher.finalize())
    }
}
