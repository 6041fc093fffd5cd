use crate::application::ml::{LoadedModel, RevenuePredictor};
use crate::domain::errors::{ModelError, PredictionError, ValidationReport};
use crate::domain::ml::feature_registry::FeatureTable;
use crate::domain::sales::prediction::PredictionResult;
use crate::domain::sales::validation::SchemaValidator;
use crate::infrastructure::observability::InferenceTimer;
use crate::infrastructure::observability::latency_tracker::{
    INFERENCE_ERROR, INFERENCE_OK, INFERENCE_PANICKED,
};
use crate::infrastructure::observability::metrics::{
    Metrics, OUTCOME_FAILED, OUTCOME_REJECTED, OUTCOME_SUCCEEDED, OUTCOME_UNAVAILABLE,
};
use crate::infrastructure::observability::reporter::ModelSnapshot;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

/// Per-request lifecycle. Rejected, Succeeded and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Validating,
    Rejected,
    Validated,
    Deriving,
    Ready,
    Invoking,
    Succeeded,
    Failed,
}

impl RequestStage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStage::Rejected | RequestStage::Succeeded | RequestStage::Failed
        )
    }
}

fn enter(stage: RequestStage) {
    debug!(stage = ?stage, terminal = stage.is_terminal(), "prediction stage");
}

/// Owns the model loaded at startup and drives every prediction request.
///
/// The model reference is set once in `new` and only read afterwards, so the
/// service can be shared across threads without locking.
pub struct PredictionService {
    model: LoadedModel,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(model: LoadedModel, metrics: Metrics) -> Self {
        metrics.set_model_loaded(model.is_some());
        Self { model, metrics }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn model_snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            loaded: self.model.is_some(),
            name: self.model.as_ref().map(|m| m.name().to_string()),
            version: self.model.as_ref().map(|m| m.version().to_string()),
        }
    }

    /// Validate, derive, infer. Each call is independent and attempted exactly once.
    pub fn submit(&self, payload: &Value) -> Result<PredictionResult, PredictionError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("prediction", %request_id);
        let _guard = span.enter();

        let outcome = self.process(payload);
        self.record(&outcome);
        outcome
    }

    /// Answer for a body that could not even be parsed as JSON.
    /// A missing model still takes precedence over the bad payload.
    pub fn reject_unreadable(&self, reason: &str) -> PredictionError {
        let error = if self.model.is_none() {
            PredictionError::ServiceUnavailable
        } else {
            let mut report = ValidationReport::default();
            report.push("body", reason);
            PredictionError::ValidationRejected(report)
        };
        self.record_error(&error);
        error
    }

    fn record(&self, outcome: &Result<PredictionResult, PredictionError>) {
        match outcome {
            Ok(result) => {
                self.metrics.inc_predictions(OUTCOME_SUCCEEDED);
                info!("Predicted revenue {:.2}", result.predicted_value);
            }
            Err(e) => self.record_error(e),
        }
    }

    fn record_error(&self, error: &PredictionError) {
        match error {
            PredictionError::ValidationRejected(report) => {
                self.metrics.inc_predictions(OUTCOME_REJECTED);
                warn!("Rejected payload: {}", report);
            }
            PredictionError::ServiceUnavailable => {
                self.metrics.inc_predictions(OUTCOME_UNAVAILABLE);
                warn!("Prediction requested but no model is loaded");
            }
            PredictionError::PredictionFailed { cause } => {
                self.metrics.inc_predictions(OUTCOME_FAILED);
                error!("Prediction failed: {}", cause);
            }
        }
    }

    fn process(&self, payload: &Value) -> Result<PredictionResult, PredictionError> {
        enter(RequestStage::Received);
        let Some(model) = self.model.as_deref() else {
            return Err(PredictionError::ServiceUnavailable);
        };

        enter(RequestStage::Validating);
        let record = SchemaValidator::validate_value(payload).map_err(|report| {
            enter(RequestStage::Rejected);
            PredictionError::ValidationRejected(report)
        })?;
        enter(RequestStage::Validated);

        if !record.has_known_category() {
            warn!(
                "Unknown ProductCategory '{}'; model behavior is undefined",
                record.product_category
            );
        }

        enter(RequestStage::Deriving);
        if record.needs_derivation() {
            debug!("PriceCompetitiveness not supplied, deriving from CompetitorPrice - ProductionCost");
        }
        let record = record.resolve();
        let table = FeatureTable::from_record(&record);
        enter(RequestStage::Ready);

        enter(RequestStage::Invoking);
        let raw = self.invoke(model, &table).map_err(|cause| {
            enter(RequestStage::Failed);
            PredictionError::PredictionFailed { cause }
        })?;

        enter(RequestStage::Succeeded);
        Ok(PredictionResult::new(raw, record))
    }

    /// Calls the model, turning errors, panics and unusable output into a cause message.
    fn invoke(&self, model: &dyn RevenuePredictor, table: &FeatureTable) -> Result<f64, String> {
        let timer = InferenceTimer::start(&self.metrics.prediction_latency_seconds);
        let outputs = match panic::catch_unwind(AssertUnwindSafe(|| model.predict(table))) {
            Ok(Ok(outputs)) => {
                debug!("Model call took {:?}", timer.finish(INFERENCE_OK));
                outputs
            }
            Ok(Err(e)) => {
                timer.finish(INFERENCE_ERROR);
                return Err(e.to_string());
            }
            Err(payload) => {
                timer.finish(INFERENCE_PANICKED);
                return Err(format!("model panicked: {}", panic_message(&*payload)));
            }
        };

        let value = outputs
            .first()
            .copied()
            .ok_or_else(|| ModelError::EmptyOutput.to_string())?;
        if !value.is_finite() {
            return Err(ModelError::NonFinite { value }.to_string());
        }
        Ok(value)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
