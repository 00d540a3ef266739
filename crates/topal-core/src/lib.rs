//! Topal Core
//!
//! Central coordination layer for the Topal browser: the address bar and
//! history drive site lookups, the Deploy Cloud home view publishes sites,
//! and loaded content is handed out only as sandboxed frame markup.

mod browser;
mod config;
mod deploy;
mod error;
mod render;

pub use browser::{Browser, LoadOutcome, LoadRequest, PageState};
pub use config::Config;
pub use deploy::{DeployCloud, DeployError, DeployForm};
pub use error::CoreError;
pub use render::SandboxedFrame;

// Re-export core components
pub use topal_navigation::{
    canonicalize, extract_domain_and_tld, is_valid_tld, sanitize_domain_input, validate_domain,
    validate_full_domain, Address, HistoryStack, InputResolution, InputResolver,
    ValidationError, DEFAULT_TLD, VALID_TLDS,
};
pub use topal_sites::{NewSite, OwnerId, OwnerIdentity, Site, SiteError, SiteStore, SqliteSiteStore};
pub use topal_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
