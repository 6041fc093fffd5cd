pub mod artifact_loader;
pub mod pipeline_trainer;
pub mod predictor;
pub mod smartcore_pipeline;

pub use artifact_loader::{ArtifactLoader, LoadedModel};
pub use predictor::RevenuePredictor;
pub use smartcore_pipeline::SalesPipeline;
