//! Preset persistence errors.

use std::path::PathBuf;
use thiserror::Error;

/// Preset file operation error.
#[derive(Debug, Error)]
pub enum PresetError {
    /// File I/O error.
    #[error("Failed to {operation} presets file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid preset list.
    #[error("Invalid presets file: {path}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Presets could not be encoded.
    #[error("Failed to serialize presets")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },
}

impl PresetError {
    /// A message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the presets at {}", operation, path.display()),
            Self::InvalidFormat { path, source } => format!(
                "The file at {} is not a valid presets file: {}",
                path.display(),
                source
            ),
            Self::Serialization { .. } => "An error occurred while saving the presets.".to_string(),
        }
    }
}

/// Result type alias for preset operations.
pub type Result<T> = std::result::Result<T, PresetError>;
