use super::feature_record::CompleteFeatureRecord;
use serde::Serialize;

/// Rounds to 2 decimal places.
///
/// Rounds the exact decimal expansion of `value` with ties to even, so
/// `2.675` (stored as 2.67499..) gives 2.67 and the exact tie `0.125` gives 0.12.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// A rounded prediction together with the exact record that produced it.
/// Built once per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_value: f64,
    pub echoed_features: CompleteFeatureRecord,
}

impl PredictionResult {
    pub fn new(raw_prediction: f64, echoed_features: CompleteFeatureRecord) -> Self {
        Self {
            predicted_value: round_to_cents(raw_prediction),
            echoed_features,
        }
    }
}
