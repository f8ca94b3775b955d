//! Append-only transaction audit log.
//!
//! Written once by the gateway on each accepted submission, never mutated.
//! The by-id index and the record vector are updated under the same write
//! lock so readers always see a consistent pair.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use shared_types::TransactionRecord;

/// Append-only, time-ordered log of accepted submissions.
#[derive(Debug, Default)]
pub struct TransactionLog {
    records: RwLock<Vec<TransactionRecord>>,
    by_id: DashMap<String, usize>,
}

impl TransactionLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn append(&self, record: TransactionRecord) {
        let mut records = self.records.write();
        self.by_id.insert(record.id.clone(), records.len());
        records.push(record);
    }

    /// Look up a record by transaction id.
    pub fn get(&self, transaction_id: &str) -> Option<TransactionRecord> {
        let index = *self.by_id.get(transaction_id)?;
        self.records.read().get(index).cloned()
    }

    /// The most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<TransactionRecord> {
        let records = self.records.read();
        records.iter().rev().take(limit).cloned().collect()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Timestamp of the most recent record.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.read().last().map(|r| r.timestamp)
    }

    /// Drop every record. Test and demo tooling only.
    pub fn clear(&self) {
        let mut records = self.records.write();
        self.by_id.clear();
        records.clear();
    }
}
