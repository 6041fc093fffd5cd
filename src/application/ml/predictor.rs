use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::FeatureTable;

/// Interface for the loaded regression pipeline.
///
/// Implementations are loaded once and then shared read-only across requests,
/// so `predict` takes `&self` and must not mutate internal state.
pub trait RevenuePredictor: Send + Sync {
    /// Score a single-row table keyed by feature name.
    /// Returns one value per row, so exactly one for our tables.
    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
