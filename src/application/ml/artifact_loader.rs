use super::predictor::RevenuePredictor;
use super::smartcore_pipeline::SalesPipeline;
use crate::domain::errors::ArtifactError;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// The model as held by the service: present after a successful startup load,
/// absent for the rest of the process lifetime otherwise.
pub type LoadedModel = Option<Arc<dyn RevenuePredictor>>;

/// Loads the model artifact exactly once at startup.
///
/// Failures are logged and turned into an absent model so the service can
/// still come up; there is no retry and no reload.
pub struct ArtifactLoader;

impl ArtifactLoader {
    pub fn load(path: &Path) -> LoadedModel {
        Self::load_with(path, |p| {
            let pipeline = SalesPipeline::load(p)?;
            info!(
                "Pipeline expects {} encoded columns ({} categorical, {} numeric)",
                pipeline.width(),
                pipeline.categorical.len(),
                pipeline.numeric.len()
            );
            Ok(Arc::new(pipeline) as Arc<dyn RevenuePredictor>)
        })
    }

    /// Same lifecycle with a caller-supplied loader
    pub fn load_with<F>(path: &Path, loader: F) -> LoadedModel
    where
        F: FnOnce(&Path) -> Result<Arc<dyn RevenuePredictor>, ArtifactError>,
    {
        match loader(path) {
            Ok(model) => {
                info!(
                    "Successfully loaded model '{}' ({}) from {:?}",
                    model.name(),
                    model.version(),
                    path
                );
                Some(model)
            }
            Err(ArtifactError::NotFound { path }) => {
                error!(
                    "Model file not found at {:?}. Prediction requests will return ServiceUnavailable.",
                    path
                );
                None
            }
            Err(e) => {
                error!(
                    "Failed to load model: {}. Prediction requests will return ServiceUnavailable.",
                    e
                );
                None
            }
        }
    }
}
