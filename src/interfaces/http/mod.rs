//! HTTP surface of the prediction service
//!
//! - `GET /` static service metadata
//! - `POST /predict` feature record in, prediction or structured error out

pub mod handlers;
pub mod responses;

use crate::application::prediction_service::PredictionService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub type SharedService = Arc<PredictionService>;

pub fn create_router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/predict", post(handlers::predict))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}
