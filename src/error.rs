use crate::controller::submission::AssembleError;
use crate::model::EntryError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Caused by what was typed rather than by the server.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Parse(_) | AppError::Validation(_) | AppError::NotFound(_)
        )
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<AssembleError> for AppError {
    fn from(err: AssembleError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}
