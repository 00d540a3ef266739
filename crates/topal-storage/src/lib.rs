//! Topal Storage Layer
//!
//! SQLite-based persistence for deployed sites and local settings.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
