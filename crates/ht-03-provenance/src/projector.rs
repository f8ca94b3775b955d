//! The batch provenance projector: single writer over the batch map.
//!
//! Per-batch mutation is atomic: `apply` holds the map entry for the whole
//! read-modify-write, so concurrent submissions for the same batch
//! serialize while different batches proceed independently.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use shared_types::{Batch, BatchSummary, CollectionRecord, ProjectionError, Stage};

use crate::domain::decode::{decode_stage_payload, StagePayload};

/// What an `apply` call did to the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The stage was recorded. `out_of_order` flags a write whose required
    /// prior stage was missing.
    Applied { stage: Stage, out_of_order: bool },
    /// The stage was already recorded; the first payload is retained.
    Duplicate(Stage),
    /// The function does not record a custody stage (e.g. a pure query
    /// function); the projection is unchanged.
    NotAStageFunction,
}

/// In-process read model of batch custody progress.
#[derive(Debug, Default)]
pub struct BatchProjector {
    batches: DashMap<String, Batch>,
}

impl BatchProjector {
    /// An empty projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret an accepted transaction as a batch-state transition.
    ///
    /// Idempotent per stage: a replay for an already-recorded stage is a
    /// no-op and the first payload wins. A write whose required prior stage
    /// is missing is accepted (the ledger is the authority on validity) but
    /// surfaced as out-of-order.
    pub fn apply(
        &self,
        batch_id: &str,
        function: &str,
        args: &[String],
    ) -> Result<ApplyOutcome, ProjectionError> {
        let Some(stage) = Stage::for_function(function) else {
            return Ok(ApplyOutcome::NotAStageFunction);
        };

        let now = Utc::now();
        let raw = args.first().map(String::as_str).unwrap_or("{}");
        // Decode before taking the entry so a bad payload never holds the lock.
        let payload = decode_stage_payload(stage, raw, now)?;

        let mut entry = self
            .batches
            .entry(batch_id.to_string())
            .or_insert_with(|| Batch::new(batch_id, now));
        let batch = entry.value_mut();

        if batch.has_stage(stage) {
            debug!(batch_id, stage = stage.label(), "stage already recorded, ignoring replay");
            return Ok(ApplyOutcome::Duplicate(stage));
        }

        let out_of_order = stage
            .required_prior()
            .is_some_and(|prior| !batch.has_stage(prior));
        if out_of_order {
            warn!(
                batch_id,
                stage = stage.label(),
                "out-of-order stage write accepted; the ledger's access policy should reject these"
            );
        }

        match payload {
            StagePayload::Collection(record) => batch.collection = Some(record),
            StagePayload::Quality(record) => batch.quality = Some(record),
            StagePayload::Processing(record) => batch.processing = Some(record),
            StagePayload::Manufacturing(record) => batch.manufacturing = Some(record),
        }
        batch.completed_steps.push(stage);
        // Keep custody order even when a write arrived out of order.
        batch.completed_steps.sort_by_key(Stage::position);
        batch.last_updated = now;

        Ok(ApplyOutcome::Applied { stage, out_of_order })
    }

    /// Immutable snapshot of one batch.
    pub fn get_batch(&self, batch_id: &str) -> Option<Batch> {
        self.batches.get(batch_id).map(|b| b.clone())
    }

    /// Summaries of every batch, most recently updated first.
    pub fn list_active(&self) -> Vec<BatchSummary> {
        let mut summaries: Vec<BatchSummary> = self
            .batches
            .iter()
            .map(|entry| {
                let batch = entry.value();
                BatchSummary {
                    batch_id: batch.batch_id.clone(),
                    species: batch.collection.as_ref().map(|c| c.species.clone()),
                    current_stage: batch.current_stage(),
                    completed_steps: batch.completed_steps.len(),
                    total_steps: Stage::ALL.len(),
                    last_updated: batch.last_updated,
                }
            })
            .collect();
        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        summaries
    }

    /// Number of batches with at least one recorded stage.
    pub fn active_count(&self) -> usize {
        self.batches.len()
    }

    /// Clear all projected state. Test and demo tooling only; production
    /// flows never reset the projection.
    pub fn reset(&self) {
        self.batches.clear();
    }

    /// Seed the demonstration baseline: one batch with only collection
    /// complete. Never called implicitly; deployments that want demo data
    /// opt in at bootstrap (and again after each reset).
    pub fn seed_demo_batches(&self) {
        if self.batches.contains_key("HERB001") {
            return;
        }
        let now = Utc::now();
        let mut batch = Batch::new("HERB001", now);
        batch.collection = Some(CollectionRecord {
            species: "Ashwagandha".to_string(),
            weight: 2500.0,
            latitude: 26.9124,
            longitude: 75.7873,
            timestamp: now - Duration::days(2),
            collector_id: Some("FARMER_001".to_string()),
        });
        batch.completed_steps.push(Stage::Collection);
        self.batches.insert(batch.batch_id.clone(), batch);
        debug!("seeded demonstration batch HERB001");
    }
}
