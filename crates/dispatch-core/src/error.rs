//! Error types for the dispatch console.

use std::path::PathBuf;

use thiserror::Error;

/// Dispatch payload assembly failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("missing required fields: {}", fields.join(", "))]
    MissingRequired { fields: Vec<String> },
}

/// A write to the backing store failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store write failed: {0}")]
pub struct StoreError(pub String);

/// Importing a project's tickets failed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to fetch tickets for project {project_id}: {message}")]
    Fetch { project_id: String, message: String },

    #[error("failed to store tickets for project {project_id}")]
    Store {
        project_id: String,
        #[source]
        source: StoreError,
    },
}

/// Executing a dispatch failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Invalid(#[from] AssembleError),

    #[error("a dispatch is already in progress")]
    InProgress,

    #[error("dispatch execution failed: {0}")]
    Execution(String),
}

/// Loading the console configuration failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from operations on a shared console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console state lock poisoned")]
    Poisoned,

    #[error("no preset selected")]
    NoPresetSelected,

    #[error(transparent)]
    Store(#[from] StoreError),
}
