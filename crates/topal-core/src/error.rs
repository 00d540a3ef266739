//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] topal_storage::StorageError),

    #[error("Site error: {0}")]
    Site(#[from] topal_sites::SiteError),

    #[error("Validation error: {0}")]
    Validation(#[from] topal_navigation::ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
