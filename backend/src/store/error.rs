use common::error::{FetchError, SubmitError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored document is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        FetchError::Failed(err.to_string())
    }
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        SubmitError::Rejected(err.to_string())
    }
}
