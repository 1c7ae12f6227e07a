use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;

/// What happens to maintenance entries (pre-step, post-step, pool-sync) when a
/// route is re-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenancePolicy {
    /// Re-emit them verbatim.
    #[default]
    PassThrough,
    /// Drop them from the committed program.
    Drop,
}

/// Tunables for the editor pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Number of characters of the entity id shown as an entity node's label.
    pub label_len: usize,
    pub maintenance: MaintenancePolicy,
    /// Refuse to commit trees that fail registry validation.
    pub reject_invalid: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            label_len: 8,
            maintenance: MaintenancePolicy::PassThrough,
            reject_invalid: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
