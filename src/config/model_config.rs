//! Model artifact configuration parsing from environment variables.

use super::EnvLookup;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "best_pipeline_model.json";

/// Where the pipeline artifact is loaded from at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub path: PathBuf,
}

impl ModelEnvConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            path: lookup("MODEL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
        }
    }
}
