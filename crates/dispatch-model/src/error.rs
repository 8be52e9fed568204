use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid preset id: {0:?}")]
    InvalidPresetId(String),
    #[error("duplicate field id: {0}")]
    DuplicateFieldId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
