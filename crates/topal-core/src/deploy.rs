//! Deploy Cloud: the home view where visitors publish and manage their sites

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use topal_navigation::{is_valid_tld, validate_domain, ValidationError, DEFAULT_TLD, VALID_TLDS};
use topal_sites::{NewSite, OwnerId, OwnerIdentity, Site, SiteError, SiteStore};

const SEARCH_LIMIT: usize = 50;

/// Failure of a deploy, worded for the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    #[error("All fields are required")]
    MissingFields,

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("This domain is already taken")]
    DomainTaken,

    #[error("Failed to deploy site")]
    Failed,
}

/// Contents of the deploy form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployForm {
    pub domain: String,
    pub tld: String,
    pub title: String,
    pub html_content: String,
}

impl Default for DeployForm {
    fn default() -> Self {
        Self {
            domain: String::new(),
            tld: DEFAULT_TLD.to_string(),
            title: String::new(),
            html_content: String::new(),
        }
    }
}

pub struct DeployCloud {
    sites: Arc<dyn SiteStore>,
    owner: Arc<OwnerIdentity>,
}

impl DeployCloud {
    pub fn new(sites: Arc<dyn SiteStore>, owner: Arc<OwnerIdentity>) -> Self {
        Self { sites, owner }
    }

    /// TLDs offered in the selection control.
    pub fn tld_options(&self) -> &'static [&'static str] {
        &VALID_TLDS
    }

    pub fn owner_id(&self) -> Option<OwnerId> {
        match self.owner.get() {
            Ok(owner) => Some(owner.clone()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load owner identity");
                None
            }
        }
    }

    /// Validate the form and publish it under the current owner.
    ///
    /// Input problems are reported before the store is touched. The name is
    /// lowercased before validation, the same rule the address bar applies.
    pub fn deploy(&self, form: DeployForm) -> Result<Site, DeployError> {
        if form.domain.is_empty() || form.title.is_empty() || form.html_content.is_empty() {
            return Err(DeployError::MissingFields);
        }

        let domain = form.domain.to_lowercase();
        validate_domain(&domain)?;
        if !is_valid_tld(&form.tld) {
            return Err(ValidationError::InvalidTld(form.tld).into());
        }

        let owner = self.owner_id().ok_or(DeployError::Failed)?;
        let new_site = NewSite::new(domain, form.tld, form.title, form.html_content, owner);

        match self.sites.create(new_site) {
            Ok(site) => Ok(site),
            Err(SiteError::DomainTaken(address)) => {
                tracing::info!(address = %address, "Domain already taken");
                Err(DeployError::DomainTaken)
            }
            Err(SiteError::Validation(e)) => Err(DeployError::Invalid(e)),
            Err(e) => {
                tracing::error!(error = %e, "Deploy error");
                Err(DeployError::Failed)
            }
        }
    }

    /// Sites deployed by the current owner, newest first. Empty on failure.
    pub fn my_sites(&self) -> Vec<Site> {
        let Some(owner) = self.owner_id() else {
            return Vec::new();
        };

        self.sites.list_by_owner(&owner).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error loading sites");
            Vec::new()
        })
    }

    /// The current owner's sites matching `query` by address or title.
    pub fn search(&self, query: &str) -> Vec<Site> {
        if query.trim().is_empty() {
            return self.my_sites();
        }

        let Some(owner) = self.owner_id() else {
            return Vec::new();
        };

        self.sites
            .search_by_owner(&owner, query, SEARCH_LIMIT)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, query = %query, "Error searching sites");
                Vec::new()
            })
    }

    /// Delete one of the current owner's sites. Failures are only logged.
    pub fn delete(&self, id: &str) -> bool {
        let Some(owner) = self.owner_id() else {
            return false;
        };

        match self.sites.delete(id, &owner) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!(site_id = %id, error = %e, "Delete error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topal_sites::SqliteSiteStore;
    use topal_storage::Database;

    fn cloud_over(db: &Database) -> DeployCloud {
        DeployCloud::new(
            Arc::new(SqliteSiteStore::new(db.clone())),
            Arc::new(OwnerIdentity::new(db.clone())),
        )
    }

    fn cloud() -> DeployCloud {
        cloud_over(&Database::open_in_memory().unwrap())
    }

    fn form(domain: &str, tld: &str) -> DeployForm {
        DeployForm {
            domain: domain.to_string(),
            tld: tld.to_string(),
            title: "My Site".to_string(),
            html_content: "<h1>Hello World!</h1>".to_string(),
        }
    }

    #[test]
    fn test_deploy_and_list() {
        let cloud = cloud();
        let site = cloud.deploy(form("mysite", ".topal")).unwrap();

        assert_eq!(site.full_domain, "mysite.topal");
        assert_eq!(Some(site.owner_id.clone()), cloud.owner_id().map(|o| o.into_string()));
        assert_eq!(cloud.my_sites(), vec![site]);
    }

    #[test]
    fn test_missing_fields() {
        let cloud = cloud();
        let mut incomplete = form("mysite", ".topal");
        incomplete.title.clear();

        assert_eq!(cloud.deploy(incomplete), Err(DeployError::MissingFields));
        assert_eq!(
            DeployError::MissingFields.to_string(),
            "All fields are required"
        );
        assert_eq!(
            cloud.deploy(DeployForm::default()),
            Err(DeployError::MissingFields)
        );
    }

    #[test]
    fn test_invalid_domain_message() {
        let cloud = cloud();
        let err = cloud.deploy(form("site42", ".topal")).unwrap_err();

        assert_eq!(err.to_string(), "Domain can only contain letters (a-z)");
        assert!(cloud.my_sites().is_empty());
    }

    #[test]
    fn test_mixed_case_domain_is_lowercased() {
        let cloud = cloud();
        let site = cloud.deploy(form("MySite", ".topal")).unwrap();

        assert_eq!(site.domain, "mysite");
        assert_eq!(site.full_domain, "mysite.topal");
        assert_eq!(
            cloud.deploy(form("mysite", ".topal")),
            Err(DeployError::DomainTaken)
        );
    }

    #[test]
    fn test_invalid_tld() {
        let cloud = cloud();
        let err = cloud.deploy(form("mysite", ".xyz")).unwrap_err();
        assert_eq!(err, DeployError::Invalid(ValidationError::InvalidTld(".xyz".to_string())));
    }

    #[test]
    fn test_domain_taken() {
        let db = Database::open_in_memory().unwrap();
        let cloud = cloud_over(&db);
        cloud.deploy(form("popular", ".aura")).unwrap();

        // Another visitor on a different device
        let other = DeployCloud::new(
            Arc::new(SqliteSiteStore::new(db.clone())),
            Arc::new(OwnerIdentity::new(Database::open_in_memory().unwrap())),
        );
        let err = other.deploy(form("popular", ".aura")).unwrap_err();
        assert_eq!(err, DeployError::DomainTaken);
        assert_eq!(err.to_string(), "This domain is already taken");
        assert!(other.my_sites().is_empty());
    }

    #[test]
    fn test_delete_own_site() {
        let cloud = cloud();
        let site = cloud.deploy(form("gone", ".ab")).unwrap();

        assert!(cloud.delete(&site.id));
        assert!(!cloud.delete(&site.id));
        assert!(cloud.my_sites().is_empty());
    }

    #[test]
    fn test_delete_other_owner_site() {
        let db = Database::open_in_memory().unwrap();
        let cloud = cloud_over(&db);
        let site = cloud.deploy(form("mine", ".topal")).unwrap();

        let other = DeployCloud::new(
            Arc::new(SqliteSiteStore::new(db.clone())),
            Arc::new(OwnerIdentity::new(Database::open_in_memory().unwrap())),
        );
        assert!(!other.delete(&site.id));
        assert_eq!(cloud.my_sites().len(), 1);
    }

    #[test]
    fn test_search() {
        let cloud = cloud();
        cloud.deploy(form("cooking", ".magic")).unwrap();
        cloud.deploy(form("gardening", ".aura")).unwrap();

        let hits = cloud.search("COOK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_domain, "cooking.magic");

        assert_eq!(cloud.search("  ").len(), 2);
        assert!(cloud.search("nothing").is_empty());
    }

    #[test]
    fn test_tld_options() {
        assert_eq!(cloud().tld_options(), [".topal", ".magic", ".aura"]);
    }
}
