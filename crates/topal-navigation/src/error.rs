//! Navigation error types

use thiserror::Error;

/// Rejected user input. The messages are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Domain is required")]
    Required,

    #[error("Domain can only contain letters (a-z)")]
    InvalidCharacters,

    #[error("Invalid domain format. Use format: name.xx (e.g., example.ab)")]
    InvalidFormat,

    #[error("Invalid TLD: {0}")]
    InvalidTld(String),
}
