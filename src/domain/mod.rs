// Domain-specific error types
pub mod errors;

// Model-facing feature layout
pub mod ml;

// Sales records, validation and derived features
pub mod sales;
