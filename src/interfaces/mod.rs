// HTTP transport (axum)
pub mod http;
