//! Site data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topal_navigation::{is_valid_tld, validate_domain, ValidationError};

use crate::owner::OwnerId;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier
    pub id: String,
    /// Name part of the address
    pub domain: String,
    /// TLD including the leading dot
    pub tld: String,
    /// Canonical address, `domain + tld`
    pub full_domain: String,
    pub title: String,
    /// Raw, untrusted HTML
    pub html_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
}

/// A site about to be deployed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSite {
    pub domain: String,
    pub tld: String,
    pub title: String,
    pub html_content: String,
    pub owner_id: OwnerId,
}

impl NewSite {
    pub fn new(
        domain: impl Into<String>,
        tld: impl Into<String>,
        title: impl Into<String>,
        html_content: impl Into<String>,
        owner_id: OwnerId,
    ) -> Self {
        Self {
            domain: domain.into().to_lowercase(),
            tld: tld.into(),
            title: title.into(),
            html_content: html_content.into(),
            owner_id,
        }
    }

    pub fn full_domain(&self) -> String {
        format!("{}{}", self.domain, self.tld)
    }

    pub fn validate(&self) -> Result<()> {
        validate_domain(&self.domain)?;
        if !is_valid_tld(&self.tld) {
            return Err(ValidationError::InvalidTld(self.tld.clone()).into());
        }
        Ok(())
    }

    /// Assign an id and timestamps.
    pub fn into_site(self) -> Site {
        let now = Utc::now();
        let full_domain = self.full_domain();

        Site {
            id: Uuid::new_v4().to_string(),
            domain: self.domain,
            tld: self.tld,
            full_domain,
            title: self.title,
            html_content: self.html_content,
            created_at: now,
            updated_at: now,
            owner_id: self.owner_id.into_string(),
        }
    }
}
