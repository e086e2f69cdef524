//! Configuration management

use crate::pipeline::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level
    pub log_level: String,
    /// File the pipeline is written to; stdout when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: None,
        }
    }
}

impl Config {
    /// Loads a configuration file. Missing fields take their default.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be read and
    /// [`PipelineError::Config`] if it is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }
}
