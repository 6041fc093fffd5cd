// Model loading, training and inference adapters
pub mod ml;

// Request orchestration
pub mod prediction_service;
