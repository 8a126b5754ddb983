//! Prometheus metrics for the ledger.
//!
//! All metrics follow the naming convention `ledger_<metric>_<unit>` and are
//! labelled by ledger name (`accounts`, `token_rels`, `nfts`, `tokens`).
//!
//! ## Metric Types
//!
//! - **Counter**: commits, rollbacks, failures, persisted and removed entities
//! - **Histogram**: commit duration per ledger

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Successful commits per ledger
    pub static ref LEDGER_COMMITS: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_commits_total", "Transactions committed"),
        &["ledger"]
    ).expect("metric creation failed");

    /// Rollbacks per ledger
    pub static ref LEDGER_ROLLBACKS: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_rollbacks_total", "Transactions rolled back"),
        &["ledger"]
    ).expect("metric creation failed");

    /// Commits that failed while persisting, leaving the transaction open
    pub static ref LEDGER_COMMIT_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_commit_failures_total", "Commits that failed mid-way"),
        &["ledger"]
    ).expect("metric creation failed");

    /// Entities written to the backing store
    pub static ref LEDGER_ENTITIES_PERSISTED: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_entities_persisted_total", "Entities put into the backing store"),
        &["ledger"]
    ).expect("metric creation failed");

    /// Entities removed from the backing store
    pub static ref LEDGER_ENTITIES_REMOVED: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_entities_removed_total", "Entities removed from the backing store"),
        &["ledger"]
    ).expect("metric creation failed");

    /// Commit duration histogram
    pub static ref LEDGER_COMMIT_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ledger_commit_duration_seconds",
            "Time spent flushing a change set"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("valid buckets")),
        &["ledger"]
    ).expect("metric creation failed");

    /// Transfer batches by outcome (`committed`, `rejected`, `rolled_back`)
    pub static ref TRANSFERS_PROCESSED: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_transfers_total", "Zero-sum transfer batches processed"),
        &["outcome"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error; the second call returns a fresh handle.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LEDGER_COMMITS.clone()),
        Box::new(LEDGER_ROLLBACKS.clone()),
        Box::new(LEDGER_COMMIT_FAILURES.clone()),
        Box::new(LEDGER_ENTITIES_PERSISTED.clone()),
        Box::new(LEDGER_ENTITIES_REMOVED.clone()),
        Box::new(LEDGER_COMMIT_DURATION.clone()),
        Box::new(TRANSFERS_PROCESSED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: prometheus::Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for one label of a histogram vector.
    pub fn new(histogram: &HistogramVec, label: &str) -> Self {
        Self {
            histogram: histogram.with_label_values(&[label]),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_twice() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_counter_increment() {
        LEDGER_ROLLBACKS.with_label_values(&["metrics-test"]).inc();
        assert!(LEDGER_ROLLBACKS.with_label_values(&["metrics-test"]).get() >= 1);
    }

    #[test]
    fn test_encode_contains_registered_family() {
        register_metrics().unwrap();
        LEDGER_COMMITS.with_label_values(&["encode-test"]).inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("ledger_commits_total"));
    }

    #[test]
    fn test_histogram_timer() {
        {
            let _timer = HistogramTimer::new(&LEDGER_COMMIT_DURATION, "timer-test");
        }
        assert_eq!(
            LEDGER_COMMIT_DURATION
                .with_label_values(&["timer-test"])
                .get_sample_count(),
            1
        );
    }
}
