use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single schema violation reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Every violation found in one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, reason));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Offending field names, deduplicated, in the order they were found
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::with_capacity(self.violations.len());
        for violation in &self.violations {
            if !fields.contains(&violation.field) {
                fields.push(violation.field.clone());
            }
        }
        fields
    }

    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} ({})", v.field, v.reason))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Outcome of a prediction request that did not succeed
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Validation rejected: {0}")]
    ValidationRejected(ValidationReport),

    #[error("Model not loaded")]
    ServiceUnavailable,

    #[error("Prediction failed: {cause}")]
    PredictionFailed { cause: String },
}

impl PredictionError {
    /// Stable identifier used on the wire and as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ValidationRejected(_) => "ValidationRejected",
            PredictionError::ServiceUnavailable => "ServiceUnavailable",
            PredictionError::PredictionFailed { .. } => "PredictionFailed",
        }
    }
}

/// Errors raised by a model while scoring a feature table
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing column '{column}' in input table")]
    MissingColumn { column: String },

    #[error("column '{column}' has the wrong type: expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model returned a non-finite value: {value}")]
    NonFinite { value: f64 },

    #[error("{reason}")]
    Backend { reason: String },
}

/// Errors raised while loading the model artifact at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialize model artifact {path:?}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_lists_fields_once() {
        let mut report = ValidationReport::default();
        report.push("CustomerRating", "must be between 1 and 5");
        report.push("StoreCount", "must be a positive integer");
        report.push("CustomerRating", "duplicate");

        assert_eq!(report.fields(), vec!["CustomerRating", "StoreCount"]);
        assert!(report.names("StoreCount"));
        assert!(!report.names("Region"));
    }

    #[test]
    fn test_prediction_error_formatting() {
        let mut report = ValidationReport::default();
        report.push("CustomerRating", "must be between 1 and 5");
        let msg = PredictionError::ValidationRejected(report).to_string();
        assert!(msg.contains("CustomerRating"));

        let failed = PredictionError::PredictionFailed {
            cause: "missing column 'Region' in input table".to_string(),
        };
        assert_eq!(
            failed.to_string(),
            "Prediction failed: missing column 'Region' in input table"
        );
        assert_eq!(PredictionError::ServiceUnavailable.to_string(), "Model not loaded");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PredictionError::ServiceUnavailable.kind(),
            "ServiceUnavailable"
        );
        assert_eq!(
            PredictionError::PredictionFailed {
                cause: String::new()
            }
            .kind(),
            "PredictionFailed"
        );
    }
}
