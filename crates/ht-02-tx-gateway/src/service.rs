//! The transaction gateway service.
//!
//! Owns backend selection, the audit log, and synchronous forwarding into
//! the batch projection: by the time `invoke` returns, the transaction is
//! in the log and the batch's stage-completion state has advanced, so no
//! caller can observe a successful invoke whose batch state lags behind.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use ht_01_ledger_client::{LedgerClient, LedgerIdentity, ReachabilityProbe};
use ht_03_provenance::{ApplyOutcome, BatchProjector};
use shared_types::{
    BlockRef, GatewayError, HealthReport, Origin, QueryResult, RawTransaction, ResolveError,
    TransactionRecord, TxResult, TxStatus,
};

use crate::audit::TransactionLog;
use crate::backend::{FallbackLedger, LedgerBackend};
use crate::domain::config::{ConfigError, FallbackPolicy, GatewayConfig};
use crate::domain::outcome::InvokeOutcome;
use crate::metrics::GatewayMetrics;

/// The single entry point other layers use to talk to the ledger.
pub struct TransactionGateway {
    config: GatewayConfig,
    client: Arc<LedgerClient>,
    projector: Arc<BatchProjector>,
    log: Arc<TransactionLog>,
    backend: RwLock<Option<LedgerBackend>>,
    probe: ReachabilityProbe,
    metrics: Arc<GatewayMetrics>,
}

impl TransactionGateway {
    /// Create a gateway over the given client and projection.
    pub fn new(
        config: GatewayConfig,
        client: Arc<LedgerClient>,
        projector: Arc<BatchProjector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            projector,
            log: Arc::new(TransactionLog::new()),
            backend: RwLock::new(None),
            probe: ReachabilityProbe::new(),
            metrics: Arc::new(GatewayMetrics::new()),
        })
    }

    /// One-time startup: probe reachability, connect when possible, select
    /// the backend. Failures are logged, never fatal; with the strict
    /// policy a failed startup leaves the gateway answering
    /// `ServiceUnavailable` until the process is restarted against a live
    /// network.
    pub async fn initialize(&self, identity: LedgerIdentity) {
        let reachable = self.probe.refresh(self.client.rpc().as_ref()).await;

        if reachable {
            match self.client.connect(identity).await {
                Ok(()) => {
                    *self.backend.write() = Some(LedgerBackend::Real(Arc::clone(&self.client)));
                    info!("gateway initialized against live ledger");
                }
                Err(e) => {
                    warn!(error = %e, "ledger connect failed at startup");
                    self.enter_fallback_if_opted_in();
                }
            }
        } else {
            warn!("ledger network not reachable at startup");
            self.enter_fallback_if_opted_in();
        }

        if self.config.seed_demo_batches {
            self.projector.seed_demo_batches();
        }
    }

    fn enter_fallback_if_opted_in(&self) {
        match self.config.fallback {
            FallbackPolicy::Demo => {
                *self.backend.write() =
                    Some(LedgerBackend::Fallback(Arc::new(FallbackLedger::new())));
                warn!("demonstration fallback mode active; all results will carry origin=fallback");
            }
            FallbackPolicy::Strict => {
                info!("strict policy: requests will fail with ServiceUnavailable until the ledger is back");
            }
        }
    }

    /// Spawn the periodic reachability probe task.
    pub fn spawn_probe(&self) -> tokio::task::JoinHandle<()> {
        self.probe
            .spawn(self.client.rpc(), self.config.probe_interval())
    }

    /// Submit a stage event to the ledger.
    ///
    /// On success the audit record and the batch projection are updated
    /// before this returns.
    pub async fn invoke(
        &self,
        function: &str,
        args: &[String],
        batch_id: Option<&str>,
    ) -> Result<InvokeOutcome, GatewayError> {
        let outcome = self.invoke_inner(function, args, batch_id).await;
        self.metrics.record_invoke(outcome.is_ok());
        outcome
    }

    async fn invoke_inner(
        &self,
        function: &str,
        args: &[String],
        batch_id: Option<&str>,
    ) -> Result<InvokeOutcome, GatewayError> {
        if function.is_empty() {
            return Err(GatewayError::InvalidRequest("function name is empty".into()));
        }
        let batch_id = match batch_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.generate_batch_id(),
        };

        let backend = self.backend.read().clone();
        let result = match backend {
            None => return Err(GatewayError::ServiceUnavailable),
            Some(LedgerBackend::Real(client)) => {
                let accepted = client
                    .submit(function, args, self.config.commit_timeout())
                    .await?;

                let block = match client.resolve_block(&accepted.transaction_id).await {
                    Ok(placement) => BlockRef::Resolved(placement.block_number),
                    Err(e) => {
                        warn!(
                            transaction_id = %accepted.transaction_id,
                            error = %e,
                            "block resolution failed, substituting timestamp estimate"
                        );
                        self.metrics.record_estimated_block();
                        BlockRef::Estimated(accepted.timestamp.timestamp().max(0) as u64)
                    }
                };

                TxResult {
                    transaction_id: accepted.transaction_id,
                    block,
                    payload: accepted.payload,
                    timestamp: accepted.timestamp,
                    origin: Origin::Real,
                }
            }
            Some(LedgerBackend::Fallback(fallback)) => {
                self.metrics.record_fallback();
                fallback.synthesize_invoke(function)
            }
        };

        self.record_accepted(function, args, &batch_id, &result);
        Ok(InvokeOutcome::from_result(batch_id, &result))
    }

    /// Audit append and projection update for one accepted submission.
    fn record_accepted(&self, function: &str, args: &[String], batch_id: &str, result: &TxResult) {
        self.log.append(TransactionRecord {
            id: result.transaction_id.clone(),
            function: function.to_string(),
            batch_id: batch_id.to_string(),
            args: args.to_vec(),
            timestamp: result.timestamp,
            block: result.block,
            status: TxStatus::Success,
            origin: result.origin,
        });

        match self.projector.apply(batch_id, function, args) {
            Ok(ApplyOutcome::Applied {
                out_of_order: true, ..
            }) => self.metrics.record_out_of_order(),
            Ok(_) => {}
            Err(e) => {
                // The ledger accepted the transaction; the projection just
                // cannot interpret the payload. The audit record stands.
                warn!(batch_id, error = %e, "accepted transaction not projectable");
            }
        }
    }

    /// Evaluate a read-only chaincode function.
    pub async fn query(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<QueryResult, GatewayError> {
        let outcome = self.query_inner(function, args).await;
        self.metrics.record_query(outcome.is_ok());
        outcome
    }

    async fn query_inner(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<QueryResult, GatewayError> {
        if function.is_empty() {
            return Err(GatewayError::InvalidRequest("function name is empty".into()));
        }

        let backend = self.backend.read().clone();
        match backend {
            None => Err(GatewayError::ServiceUnavailable),
            Some(LedgerBackend::Real(client)) => {
                let payload = client.evaluate(function, args).await?;
                Ok(QueryResult {
                    payload,
                    timestamp: Utc::now(),
                    origin: Origin::Real,
                })
            }
            Some(LedgerBackend::Fallback(fallback)) => {
                self.metrics.record_fallback();
                Ok(fallback.synthesize_query(function))
            }
        }
    }

    /// Provenance document for one batch, straight from the chaincode.
    pub async fn provenance(&self, batch_id: &str) -> Result<QueryResult, GatewayError> {
        self.query("GetProvenance", &[batch_id.to_string()]).await
    }

    /// Full ledger record for one committed transaction. Real backend only:
    /// raw ledger data cannot be synthesized.
    pub async fn raw_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<RawTransaction, GatewayError> {
        let backend = self.backend.read().clone();
        let client = match backend {
            Some(LedgerBackend::Real(client)) => client,
            _ => return Err(GatewayError::ServiceUnavailable),
        };

        let proof = client
            .transaction_proof(transaction_id)
            .await
            .map_err(|e| match e {
                ResolveError::NotVisible(id) => GatewayError::UnknownTransaction(id),
                other => GatewayError::Resolve(other),
            })?;

        let profile = self.client.profile();
        Ok(RawTransaction {
            transaction_id: transaction_id.to_string(),
            block_number: proof.block_number,
            validation_code: proof.validation_code,
            payload: proof.payload,
            timestamp: proof.timestamp,
            network: profile.network_name.clone(),
            channel: profile.channel.clone(),
            chaincode: profile.chaincode.clone(),
        })
    }

    /// Aggregate health view.
    pub fn health(&self) -> HealthReport {
        let connected = matches!(
            self.backend.read().as_ref(),
            Some(LedgerBackend::Real(_))
        );
        HealthReport {
            connected,
            reachable: self.probe.is_reachable(),
            total_transactions: self.log.len(),
            active_batches: self.projector.active_count(),
            last_transaction_at: self.log.last_timestamp(),
        }
    }

    /// Clear the audit log and projection, re-seeding the demo baseline
    /// when the deployment opted into it. Test and demo tooling only.
    pub fn reset_state(&self) {
        self.log.clear();
        self.projector.reset();
        if self.config.seed_demo_batches {
            self.projector.seed_demo_batches();
        }
    }

    /// Generated batch identifier: configured prefix plus a six-digit
    /// time-derived suffix.
    fn generate_batch_id(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        format!("{}{:06}", self.config.batch_id_prefix, millis % 1_000_000)
    }

    /// The audit log handle.
    pub fn log(&self) -> Arc<TransactionLog> {
        Arc::clone(&self.log)
    }

    /// The projection handle.
    pub fn projector(&self) -> Arc<BatchProjector> {
        Arc::clone(&self.projector)
    }

    /// The metrics handle.
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The active configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The network topology the gateway operates against.
    pub fn profile(&self) -> &ht_01_ledger_client::ConnectionProfile {
        self.client.profile()
    }
}
