//! Push-based metrics reporter for revcast
//!
//! Periodically outputs metrics as structured JSON to stdout.

use crate::infrastructure::observability::metrics::{
    Metrics, OUTCOME_FAILED, OUTCOME_REJECTED, OUTCOME_SUCCEEDED, OUTCOME_UNAVAILABLE,
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model: ModelSnapshot,
    pub predictions: PredictionsSnapshot,
}

/// Artifact status, fixed at startup
#[derive(Debug, Clone, Serialize)]
pub struct ModelSnapshot {
    pub loaded: bool,
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictionsSnapshot {
    pub succeeded: u64,
    pub rejected: u64,
    pub failed: u64,
    pub unavailable: u64,
    pub mean_latency_ms: Option<f64>,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    model: ModelSnapshot,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// # Arguments
    /// * `metrics` - Prometheus metrics shared with the prediction service
    /// * `model` - Artifact status captured after the startup load
    /// * `interval_seconds` - How often to output metrics (default: 60)
    pub fn new(metrics: Metrics, model: ModelSnapshot, interval_seconds: u64) -> Self {
        Self {
            metrics,
            model,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefix lets log shippers filter metric lines
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Predictions: {} ok | {} rejected | {} failed | {} unavailable | Uptime: {}s",
                        snapshot.predictions.succeeded,
                        snapshot.predictions.rejected,
                        snapshot.predictions.failed,
                        snapshot.predictions.unavailable,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    pub fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let (samples, total_seconds) = self.metrics.inference_latency_totals();
        let mean_latency_ms = (samples > 0).then(|| total_seconds / samples as f64 * 1000.0);

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: self.model.clone(),
            predictions: PredictionsSnapshot {
                succeeded: self.metrics.predictions(OUTCOME_SUCCEEDED),
                rejected: self.metrics.predictions(OUTCOME_REJECTED),
                failed: self.metrics.predictions(OUTCOME_FAILED),
                unavailable: self.metrics.predictions(OUTCOME_UNAVAILABLE),
                mean_latency_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absent_model() -> ModelSnapshot {
        ModelSnapshot {
            loaded: false,
            name: None,
            version: None,
        }
    }

    #[test]
    fn test_metrics_snapshot_collection() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions(OUTCOME_UNAVAILABLE);
        let reporter = MetricsReporter::new(metrics, absent_model(), 60);

        let snapshot = reporter.collect_snapshot();

        assert_eq!(snapshot.predictions.unavailable, 1);
        assert_eq!(snapshot.predictions.succeeded, 0);
        assert!(snapshot.predictions.mean_latency_ms.is_none());
        assert!(!snapshot.model.loaded);
        assert!(!snapshot.timestamp.is_empty());
    }

    #[test]
    fn test_snapshot_mean_latency_covers_failed_calls() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let latency = &metrics.prediction_latency_seconds;
        latency.with_label_values(&["ok"]).observe(0.001);
        latency.with_label_values(&["error"]).observe(0.003);
        let reporter = MetricsReporter::new(metrics, absent_model(), 60);

        let mean = reporter.collect_snapshot().predictions.mean_latency_ms.unwrap();
        assert!((mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = MetricsSnapshot {
            timestamp: "2026-01-10T10:00:00Z".to_string(),
            uptime_seconds: 3600,
            version: "0.1.0".to_string(),
            model: ModelSnapshot {
                loaded: true,
                name: Some("SmartCore Random Forest pipeline".to_string()),
                version: Some("v1".to_string()),
            },
            predictions: PredictionsSnapshot {
                succeeded: 42,
                rejected: 3,
                failed: 0,
                unavailable: 0,
                mean_latency_ms: Some(0.8),
            },
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize");
        assert!(json.contains("SmartCore Random Forest pipeline"));
        assert!(json.contains("\"succeeded\":42"));
    }

    #[tokio::test]
    async fn test_reporter_runs_until_cancelled() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let reporter = MetricsReporter::new(metrics, absent_model(), 1);
        let handle = tokio::spawn(reporter.run());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
