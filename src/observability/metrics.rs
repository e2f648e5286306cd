//! Repository counters
//!
//! - Counters only, monotonic
//! - Reset only when the repository is created
//! - Relaxed atomics; values are exact once the counted calls have returned

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Per-repository operation counters
#[derive(Debug, Default)]
pub struct RepoMetrics {
    creates: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    lookups: AtomicU64,
    queries: AtomicU64,
    rows_materialized: AtomicU64,
    failures: AtomicU64,
}

impl RepoMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_creates(&self) {
        self.creates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updates(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Single-row reads by identifier
    pub fn increment_lookups(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_materialized(&self, rows: u64) {
        self.rows_materialized.fetch_add(rows, Ordering::Relaxed);
    }

    /// Any operation that returned an error
    pub fn increment_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            creates: self.creates.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            rows_materialized: self.rows_materialized.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RepoMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub lookups: u64,
    pub queries: u64,
    pub rows_materialized: u64,
    pub failures: u64,
}
