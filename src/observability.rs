//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    docs_saved: AtomicU64,
    docs_loaded: AtomicU64,
    saves_rejected: AtomicU64,
    saves_compensated: AtomicU64,
    docs_swept: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_saved(&self) {
        self.docs_saved.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "docs_saved", "Metric incremented");
    }

    pub fn doc_loaded(&self) {
        self.docs_loaded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "docs_loaded", "Metric incremented");
    }

    pub fn save_rejected(&self) {
        self.saves_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "saves_rejected", "Metric incremented");
    }

    pub fn save_compensated(&self) {
        self.saves_compensated.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "saves_compensated", "Metric incremented");
    }

    pub fn docs_swept(&self, count: u64) {
        self.docs_swept.fetch_add(count, Ordering::Relaxed);
        tracing::debug!(counter = "docs_swept", count, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            docs_saved: self.docs_saved.load(Ordering::Relaxed),
            docs_loaded: self.docs_loaded.load(Ordering::Relaxed),
            saves_rejected: self.saves_rejected.load(Ordering::Relaxed),
            saves_compensated: self.saves_compensated.load(Ordering::Relaxed),
            docs_swept: self.docs_swept.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub docs_saved: u64,
    pub docs_loaded: u64,
    pub saves_rejected: u64,
    pub saves_compensated: u64,
    pub docs_swept: u64,
}
