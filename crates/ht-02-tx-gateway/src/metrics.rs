//! Gateway metrics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for gateway traffic and degradation events.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Total invoke calls.
    pub invokes_total: AtomicU64,
    /// Invokes that returned success.
    pub invokes_success: AtomicU64,
    /// Invokes that returned an error.
    pub invokes_error: AtomicU64,
    /// Total query calls.
    pub queries_total: AtomicU64,
    /// Queries that returned success.
    pub queries_success: AtomicU64,
    /// Queries that returned an error.
    pub queries_error: AtomicU64,
    /// Results served by the fallback synthesizer.
    pub fallback_results: AtomicU64,
    /// Block resolutions degraded to an estimate.
    pub estimated_blocks: AtomicU64,
    /// Stage writes accepted out of custody order.
    pub out_of_order_writes: AtomicU64,
}

impl GatewayMetrics {
    /// Fresh zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invoke outcome.
    pub fn record_invoke(&self, success: bool) {
        self.invokes_total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.invokes_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.invokes_error.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a query outcome.
    pub fn record_query(&self, success: bool) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.queries_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.queries_error.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a fallback-synthesized result.
    pub fn record_fallback(&self) {
        self.fallback_results.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a block resolution degraded to an estimate.
    pub fn record_estimated_block(&self) {
        self.estimated_blocks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an out-of-order stage write.
    pub fn record_out_of_order(&self) {
        self.out_of_order_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Export as JSON for the admin surface.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "invokes": {
                "total": self.invokes_total.load(Ordering::Relaxed),
                "success": self.invokes_success.load(Ordering::Relaxed),
                "error": self.invokes_error.load(Ordering::Relaxed),
            },
            "queries": {
                "total": self.queries_total.load(Ordering::Relaxed),
                "success": self.queries_success.load(Ordering::Relaxed),
                "error": self.queries_error.load(Ordering::Relaxed),
            },
            "degradation": {
                "fallback_results": self.fallback_results.load(Ordering::Relaxed),
                "estimated_blocks": self.estimated_blocks.load(Ordering::Relaxed),
                "out_of_order_writes": self.out_of_order_writes.load(Ordering::Relaxed),
            },
        })
    }
}
