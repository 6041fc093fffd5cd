use crate::domain::errors::{FieldViolation, PredictionError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Static metadata returned by `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub usage: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: "Sales Revenue Prediction API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Predicts sales revenue from product and market features.".to_string(),
            usage: "Send a POST request to /predict with a JSON object of the twelve feature \
                    fields (PriceCompetitiveness optional) to get the predicted sales revenue."
                .to_string(),
        }
    }
}

/// Error body shared by every non-200 prediction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<ViolationBody>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationBody {
    pub field: String,
    pub reason: String,
}

impl From<&FieldViolation> for ViolationBody {
    fn from(v: &FieldViolation) -> Self {
        Self {
            field: v.field.clone(),
            reason: v.reason.clone(),
        }
    }
}

/// Maps a [`PredictionError`] onto an HTTP status and JSON body
#[derive(Debug)]
pub struct ApiError(pub PredictionError);

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PredictionError::ValidationRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictionError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictionError::PredictionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (fields, violations) = match &self.0 {
            PredictionError::ValidationRejected(report) => (
                Some(report.fields()),
                Some(report.violations().iter().map(ViolationBody::from).collect()),
            ),
            _ => (None, None),
        };

        ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
            fields,
            violations,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationReport;

    #[test]
    fn test_status_mapping() {
        let mut report = ValidationReport::default();
        report.push("StoreCount", "must be a positive integer");
        assert_eq!(
            ApiError(PredictionError::ValidationRejected(report)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError(PredictionError::ServiceUnavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(PredictionError::PredictionFailed {
                cause: "boom".to_string()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let mut report = ValidationReport::default();
        report.push("CustomerRating", "must be between 1 and 5");
        let body = ApiError(PredictionError::ValidationRejected(report)).body();
        assert_eq!(body.error, "ValidationRejected");
        assert_eq!(body.fields, Some(vec!["CustomerRating".to_string()]));
        assert_eq!(body.violations.unwrap()[0].reason, "must be between 1 and 5");
    }

    #[test]
    fn test_unavailable_body_omits_fields() {
        let body = ApiError(PredictionError::ServiceUnavailable).body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "ServiceUnavailable");
        assert_eq!(json["message"], "Model not loaded");
        assert!(json.get("fields").is_none());
    }
}
