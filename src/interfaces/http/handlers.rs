use super::SharedService;
use super::responses::{ApiError, ServiceInfo};
use crate::domain::errors::PredictionError;
use crate::domain::sales::prediction::PredictionResult;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

/// GET / - static service metadata
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// POST /predict - score one feature record
pub async fn predict(
    State(service): State<SharedService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let payload = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => return Err(service.reject_unreadable(&rejection.body_text()).into()),
    };

    // Inference is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || service.submit(&payload))
        .await
        .unwrap_or_else(|e| {
            Err(PredictionError::PredictionFailed {
                cause: format!("inference task aborted: {}", e),
            })
        })?;

    Ok(Json(result))
}
