use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store could not be opened. Loads abort and keep the previous state.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to save {name}: {reason}")]
    WriteFailure { name: String, reason: String },

    #[error("Failed to delete record {id}: {reason}")]
    DeleteFailure { id: RecordId, reason: String },

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid action: {0}")]
    Action(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
