//! Console configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ranker::DEFAULT_RESOURCE_SOURCES;

/// Settings of a dispatch console session.
///
/// Every key is optional in the config file; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Query properties kept from the live query when a preset is loaded.
    pub maintain_depth: Vec<String>,
    /// Status names treated as closed by the status filter options.
    pub closed_statuses: Vec<String>,
    /// Record paths the resource ranker counts identifiers from.
    pub resource_sources: Vec<String>,
    /// Where presets are persisted.
    pub presets_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            maintain_depth: vec!["tags".to_string()],
            closed_statuses: Vec::from(["Closed", "Completed", "Cancelled"].map(String::from)),
            resource_sources: Vec::from(DEFAULT_RESOURCE_SOURCES.map(String::from)),
            presets_file: None,
        }
    }
}

impl ConsoleConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    #[must_use]
    pub fn with_maintain_depth(mut self, properties: Vec<String>) -> Self {
        self.maintain_depth = properties;
        self
    }

    #[must_use]
    pub fn with_closed_statuses(mut self, statuses: Vec<String>) -> Self {
        self.closed_statuses = statuses;
        self
    }

    #[must_use]
    pub fn with_resource_sources(mut self, sources: Vec<String>) -> Self {
        self.resource_sources = sources;
        self
    }

    #[must_use]
    pub fn with_presets_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.presets_file = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ConsoleConfig =
            serde_json::from_str(r#"{"closed_statuses": ["Done"]}"#).unwrap();
        assert_eq!(config.closed_statuses, vec!["Done".to_string()]);
        assert_eq!(config.maintain_depth, vec!["tags".to_string()]);
        assert!(config.presets_file.is_none());
    }
}
