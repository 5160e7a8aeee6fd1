//! Metrics hooks for GCS filter operations
//!
//! Counters for filter construction and queries, so the orchestration layer
//! can export them to whatever metrics system it runs.
//!
//! ## Usage
//!
//! ```ignore
//! use gcs_filter::metrics::Metrics;
//!
//! let metrics = Metrics::new();
//! metrics.record_filter_built(filter.n(), filter.size_bytes(), elapsed);
//! metrics.record_query(1, elapsed, found);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for filter operations
///
/// Thread-safe counters for monitoring filter size and query performance.
#[derive(Default)]
pub struct Metrics {
    /// Total filters built
    pub filters_built: AtomicU64,
    /// Total distinct items encoded across all filters
    pub items_encoded: AtomicU64,
    /// Total encoded filter bytes
    pub bytes_encoded: AtomicU64,
    /// Total queries (single or batch)
    pub queries_performed: AtomicU64,
    /// Queries that reported a possible match
    pub queries_positive: AtomicU64,
    /// Total targets hashed across all queries
    pub targets_queried: AtomicU64,
    /// Cumulative build time in nanoseconds
    pub build_time_ns: AtomicU64,
    /// Cumulative query time in nanoseconds
    pub query_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a built filter
    ///
    /// # Arguments
    /// * `items` - Distinct items encoded
    /// * `bytes` - Size of the encoded body
    /// * `duration` - Time taken to build
    pub fn record_filter_built(&self, items: u32, bytes: usize, duration: Duration) {
        self.filters_built.fetch_add(1, Ordering::Relaxed);
        self.items_encoded.fetch_add(u64::from(items), Ordering::Relaxed);
        self.bytes_encoded.fetch_add(bytes as u64, Ordering::Relaxed);
        self.build_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a query
    ///
    /// # Arguments
    /// * `targets` - Number of targets checked (1 for a single lookup)
    /// * `duration` - Time taken
    /// * `found` - Whether a possible match was reported
    pub fn record_query(&self, targets: usize, duration: Duration, found: bool) {
        self.queries_performed.fetch_add(1, Ordering::Relaxed);
        self.targets_queried
            .fetch_add(targets as u64, Ordering::Relaxed);
        self.query_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.queries_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_built: self.filters_built.load(Ordering::Relaxed),
            items_encoded: self.items_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            queries_performed: self.queries_performed.load(Ordering::Relaxed),
            queries_positive: self.queries_positive.load(Ordering::Relaxed),
            targets_queried: self.targets_queried.load(Ordering::Relaxed),
            avg_build_ns: self.avg_build_time_ns(),
            avg_query_ns: self.avg_query_time_ns(),
        }
    }

    /// Calculate average build time in nanoseconds
    pub fn avg_build_time_ns(&self) -> u64 {
        let total = self.build_time_ns.load(Ordering::Relaxed);
        let count = self.filters_built.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Calculate average query time in nanoseconds
    pub fn avg_query_time_ns(&self) -> u64 {
        let total = self.query_time_ns.load(Ordering::Relaxed);
        let count = self.queries_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Average encoded bits per item across all filters
    pub fn bits_per_item(&self) -> f64 {
        let items = self.items_encoded.load(Ordering::Relaxed);
        let bytes = self.bytes_encoded.load(Ordering::Relaxed);
        if items > 0 {
            (bytes * 8) as f64 / items as f64
        } else {
            0.0
        }
    }

    /// Ratio of positive queries to total queries.
    ///
    /// Includes true positives, so it only bounds the false positive rate
    /// from above.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.queries_performed.load(Ordering::Relaxed);
        let positive = self.queries_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_built.store(0, Ordering::Relaxed);
        self.items_encoded.store(0, Ordering::Relaxed);
        self.bytes_encoded.store(0, Ordering::Relaxed);
        self.queries_performed.store(0, Ordering::Relaxed);
        self.queries_positive.store(0, Ordering::Relaxed);
        self.targets_queried.store(0, Ordering::Relaxed);
        self.build_time_ns.store(0, Ordering::Relaxed);
        self.query_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct MetricsSnapshot {
    pub filters_built: u64,
    pub items_encoded: u64,
    pub bytes_encoded: u64,
    pub queries_performed: u64,
    pub queries_positive: u64,
    pub targets_queried: u64,
    pub avg_build_ns: u64,
    pub avg_query_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    /// Record a built filter
    fn record_filter_built(&self, items: u32, bytes: usize, duration: Duration);

    /// Record a query
    fn record_query(&self, targets: usize, duration: Duration, found: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_built(&self, _: u32, _: usize, _: Duration) {}
    fn record_query(&self, _: usize, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_built(&self, items: u32, bytes: usize, duration: Duration) {
        Metrics::record_filter_built(self, items, bytes, duration);
    }

    fn record_query(&self, targets: usize, duration: Duration, found: bool) {
        Metrics::record_query(self, targets, duration, found);
    }
}
