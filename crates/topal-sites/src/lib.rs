//! Topal Sites
//!
//! - A site is a titled HTML document published under one canonical address
//! - Addresses are unique across all owners
//! - Only the owner that deployed a site may delete it
//! - Owners are anonymous: a random identifier kept in local storage

mod error;
mod owner;
mod site;
mod store;

pub use error::SiteError;
pub use owner::{OwnerId, OwnerIdentity};
pub use site::{NewSite, Site};
pub use store::{SiteStore, SqliteSiteStore};

pub type Result<T> = std::result::Result<T, SiteError>;
