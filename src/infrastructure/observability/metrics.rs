//! Prometheus metrics definitions for revcast
//!
//! All metrics use the `revcast_` prefix and are read-only.

use super::latency_tracker::INFERENCE_RESULTS;
use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Outcome labels for `revcast_predictions_total`
pub const OUTCOME_SUCCEEDED: &str = "succeeded";
pub const OUTCOME_REJECTED: &str = "rejected";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_UNAVAILABLE: &str = "unavailable";

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Prediction requests by outcome
    pub predictions_total: CounterVec,
    /// Time spent inside the model call, by call result
    pub prediction_latency_seconds: HistogramVec,
    /// Model artifact status (0=absent, 1=loaded)
    pub model_loaded: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("revcast_predictions_total", "Prediction requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "revcast_prediction_latency_seconds",
                "Model inference latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5,
            ]),
            &["result"],
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let model_loaded = Gauge::with_opts(Opts::new(
            "revcast_model_loaded",
            "Model artifact status (0=absent, 1=loaded)",
        ))?;
        registry.register(Box::new(model_loaded.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "revcast_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_latency_seconds,
            model_loaded,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Increment the prediction counter for one outcome
    pub fn inc_predictions(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn predictions(&self, outcome: &str) -> u64 {
        self.predictions_total.with_label_values(&[outcome]).get() as u64
    }

    /// Sample count and summed seconds across every inference result
    pub fn inference_latency_totals(&self) -> (u64, f64) {
        INFERENCE_RESULTS.iter().fold((0, 0.0), |(count, sum), result| {
            let h = self.prediction_latency_seconds.with_label_values(&[*result]);
            (count + h.get_sample_count(), sum + h.get_sample_sum())
        })
    }

    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(if loaded { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        assert!(metrics.render().contains("revcast_"));
    }

    #[test]
    fn test_prediction_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions(OUTCOME_SUCCEEDED);
        metrics.inc_predictions(OUTCOME_SUCCEEDED);
        metrics.inc_predictions(OUTCOME_REJECTED);
        assert_eq!(metrics.predictions(OUTCOME_SUCCEEDED), 2);
        assert_eq!(metrics.predictions(OUTCOME_REJECTED), 1);
        assert_eq!(metrics.predictions(OUTCOME_FAILED), 0);
        assert!(metrics.render().contains("revcast_predictions_total"));
    }

    #[test]
    fn test_model_loaded_gauge() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.set_model_loaded(true);
        assert!(metrics.render().contains("revcast_model_loaded 1"));
    }

    #[test]
    fn test_inference_latency_totals_span_all_results() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics
            .prediction_latency_seconds
            .with_label_values(&["ok"])
            .observe(0.002);
        metrics
            .prediction_latency_seconds
            .with_label_values(&["panicked"])
            .observe(0.004);

        let (count, sum) = metrics.inference_latency_totals();
        assert_eq!(count, 2);
        assert!((sum - 0.006).abs() < 1e-12);
    }
}
