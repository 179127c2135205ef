// Portal configuration
// Decision: One optional YAML file with storage, auth and telemetry sections
// Decision: Every field has a default, so an empty file is a valid configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use studentportal_core::telemetry::TelemetryConfig;
use studentportal_core::PortalSection;
use studentportal_storage::StorageConfig;

use super::validation::DEFAULT_MIN_PASSWORD_LENGTH;

/// Auth flow policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minimum signup password length, in UTF-16 code units
    pub min_password_length: usize,
    /// Section shown after login or session restore
    pub default_section: PortalSection,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            default_section: PortalSection::Schedule,
        }
    }
}

/// Complete portal configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub telemetry: TelemetryConfig,
}

impl PortalConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse portal configuration")
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            backend = ?config.storage.backend,
            "Loaded portal configuration"
        );
        Ok(config)
    }
}
