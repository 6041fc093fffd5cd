//! Configuration module for revcast.
//!
//! Settings come from environment variables (optionally seeded from a `.env`
//! file by the binaries), organized by concern: Server, Model and Observability.

mod model_config;
mod observability_config;
mod server_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Reads one configuration key. Lets tests supply values without touching the process environment.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub model: ModelEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let server = ServerEnvConfig::from_lookup(lookup).context("Failed to load server config")?;
        let model = ModelEnvConfig::from_lookup(lookup);
        let observability = ObservabilityEnvConfig::from_lookup(lookup);

        Ok(Self {
            server,
            model,
            observability,
        })
    }
}
