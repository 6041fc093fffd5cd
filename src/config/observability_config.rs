//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the periodic metrics reporter settings.

use super::EnvLookup;

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup("OBSERVABILITY_ENABLED")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(defaults.enabled),
            interval_seconds: lookup("OBSERVABILITY_INTERVAL")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.interval_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(&|_| None);
        assert!(config.enabled);
        assert_eq!(config.interval_seconds, 60);
    }

    #[test]
    fn test_observability_config_invalid_values_fall_back() {
        let config = ObservabilityEnvConfig::from_lookup(&|key| match key {
            "OBSERVABILITY_ENABLED" => Some("nope".to_string()),
            "OBSERVABILITY_INTERVAL" => Some("0".to_string()),
            _ => None,
        });
        assert!(config.enabled);
        assert_eq!(config.interval_seconds, 60);
    }
}
