//! Dispatcher metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Payloads built
    built_count: AtomicU64,
    /// Payloads rendered instead of sent
    inspected_count: AtomicU64,
    /// Payloads sent (any HTTP status)
    transmitted_count: AtomicU64,
    /// Sends that got a non-2xx status
    rejected_count: AtomicU64,
    /// Dispatches that failed before a response was read
    failure_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn built_count(&self) -> u64 {
        self.built_count.load(Ordering::Relaxed)
    }

    pub fn inc_built_count(&self) {
        self.built_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inspected_count(&self) -> u64 {
        self.inspected_count.load(Ordering::Relaxed)
    }

    pub fn inc_inspected_count(&self) {
        self.inspected_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transmitted_count(&self) -> u64 {
        self.transmitted_count.load(Ordering::Relaxed)
    }

    pub fn inc_transmitted_count(&self) {
        self.transmitted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn inc_rejected_count(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            built_count: self.built_count(),
            inspected_count: self.inspected_count(),
            transmitted_count: self.transmitted_count(),
            rejected_count: self.rejected_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub built_count: u64,
    pub inspected_count: u64,
    pub transmitted_count: u64,
    pub rejected_count: u64,
    pub failure_count: u64,
}
