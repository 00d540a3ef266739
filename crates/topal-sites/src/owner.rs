//! Anonymous owner identity
//!
//! Generated on first use, stored in the settings table and reused for every
//! later session against the same database.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

use topal_storage::Database;

use crate::Result;

const OWNER_ID_KEY: &str = "topal_owner_id";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// A fresh identifier: `owner_<unix millis>_<13 random chars>`.
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "owner_{}_{}",
            Utc::now().timestamp_millis(),
            &random[..13]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lazily loads the owner identifier once and caches it for the process.
pub struct OwnerIdentity {
    db: Database,
    cached: OnceLock<OwnerId>,
}

impl OwnerIdentity {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cached: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<&OwnerId> {
        if let Some(owner) = self.cached.get() {
            return Ok(owner);
        }

        let stored = self
            .db
            .get_or_insert_setting(OWNER_ID_KEY, || OwnerId::generate().into_string())?;

        let owner = self.cached.get_or_init(|| OwnerId(stored));
        tracing::debug!(owner_id = %owner, "Loaded owner identity");
        Ok(owner)
    }
}
