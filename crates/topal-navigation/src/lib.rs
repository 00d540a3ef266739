//! Topal Navigation
//!
//! - Domain parsing: free-form input → canonical `name.tld` address
//! - Address bar input resolution with a default TLD for bare names
//! - Session history stack with back/forward/refresh

mod domain;
mod error;
mod history;
mod input;

pub use domain::{
    canonicalize, extract_domain_and_tld, is_valid_tld, sanitize_domain_input, validate_domain,
    validate_full_domain, Address, DEFAULT_TLD, VALID_TLDS,
};
pub use error::ValidationError;
pub use history::HistoryStack;
pub use input::{InputResolution, InputResolver};

pub type Result<T> = std::result::Result<T, ValidationError>;
