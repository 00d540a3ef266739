//! Site error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Domain already taken: {0}")]
    DomainTaken(String),

    #[error("Validation error: {0}")]
    Validation(#[from] topal_navigation::ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] topal_storage::StorageError),
}
