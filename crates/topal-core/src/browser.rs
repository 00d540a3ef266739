//! Main browser state container
//!
//! Owns the session history, the address bar resolver and the page that is
//! currently shown. Site lookups are tagged with a navigation generation so a
//! slow response can never replace the page of a newer navigation.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use topal_navigation::{HistoryStack, InputResolution, InputResolver};
use topal_sites::{OwnerIdentity, Site, SiteStore, SqliteSiteStore};
use topal_storage::Database;

use crate::config::Config;
use crate::deploy::DeployCloud;
use crate::render::SandboxedFrame;
use crate::Result;

/// What the content area shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum PageState {
    /// The Deploy Cloud home view
    Home,
    Loading { address: String },
    Loaded(Site),
    NotFound { address: String },
    Failed { address: String },
}

impl PageState {
    /// User-facing message for the error states.
    pub fn error_message(&self) -> Option<String> {
        match self {
            PageState::NotFound { address } => Some(format!("Site not found: {address}")),
            PageState::Failed { .. } => Some("Failed to load site".to_string()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading { .. })
    }
}

/// A pending site lookup, issued by a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    address: String,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Result of a site lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(Site),
    NotFound,
    /// The store failed; details are logged, not shown
    Failed,
}

struct Page {
    generation: u64,
    state: PageState,
}

/// Main browser instance
pub struct Browser {
    /// Configuration
    config: Config,
    /// Site record store
    sites: Arc<dyn SiteStore>,
    /// Anonymous owner of deployed sites
    owner: Arc<OwnerIdentity>,
    /// Session history
    history: Arc<RwLock<HistoryStack>>,
    /// Input resolver for address bar
    input_resolver: InputResolver,
    /// Current page and the generation of the navigation that produced it
    page: Arc<RwLock<Page>>,
    frame: SandboxedFrame,
}

impl Browser {
    /// Open the configured database and start a session at the home view.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.database_path)?;
        let sites = Arc::new(SqliteSiteStore::new(db.clone()));
        let owner = Arc::new(OwnerIdentity::new(db));

        let browser = Self::with_store(config, sites, owner);

        tracing::info!(
            database = %browser.config.database_path.display(),
            home = %browser.config.home_address,
            "Browser initialized"
        );

        Ok(browser)
    }

    /// Build a browser over an existing store.
    pub fn with_store(
        config: Config,
        sites: Arc<dyn SiteStore>,
        owner: Arc<OwnerIdentity>,
    ) -> Self {
        let history = HistoryStack::new(config.home_address.clone());
        let input_resolver = InputResolver::with_default_tld(config.default_tld.clone());
        let frame = SandboxedFrame::new(config.allow_scripts);

        Self {
            config,
            sites,
            owner,
            history: Arc::new(RwLock::new(history)),
            input_resolver,
            page: Arc::new(RwLock::new(Page {
                generation: 0,
                state: PageState::Home,
            })),
            frame,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Controller for the home view, sharing this browser's store and owner.
    pub fn deploy_cloud(&self) -> DeployCloud {
        DeployCloud::new(Arc::clone(&self.sites), Arc::clone(&self.owner))
    }

    // === Navigation operations ===

    /// Navigate to whatever the user typed in the address bar.
    ///
    /// Typing the current address reloads it without adding a history entry.
    pub fn navigate(&self, input: &str) -> Option<LoadRequest> {
        let address = match self.input_resolver.resolve(input) {
            InputResolution::Ignore => return None,
            InputResolution::Navigate(address) => address,
        };

        if !self.history.write().navigate(address.clone()) {
            tracing::debug!(address = %address, "Already at address, reloading");
        }

        self.begin_load()
    }

    pub fn go_back(&self) -> Option<LoadRequest> {
        if !self.history.write().go_back() {
            return None;
        }
        self.begin_load()
    }

    pub fn go_forward(&self) -> Option<LoadRequest> {
        if !self.history.write().go_forward() {
            return None;
        }
        self.begin_load()
    }

    /// Reload the current entry.
    pub fn refresh(&self) -> Option<LoadRequest> {
        tracing::debug!(address = %self.history.read().refresh(), "Refresh");
        self.begin_load()
    }

    pub fn go_home(&self) {
        let home = self.config.home_address.clone();
        self.history.write().navigate(home);
        self.begin_load();
    }

    pub fn can_go_back(&self) -> bool {
        self.history.read().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.read().can_go_forward()
    }

    pub fn current_address(&self) -> String {
        self.history.read().current().to_string()
    }

    /// Snapshot of the session history.
    pub fn history(&self) -> HistoryStack {
        self.history.read().clone()
    }

    // === Page loading ===

    /// Start showing the current entry.
    ///
    /// Supersedes every earlier request. The home view needs no lookup, so it
    /// yields `None`.
    pub fn begin_load(&self) -> Option<LoadRequest> {
        let address = self.current_address();
        let mut page = self.page.write();
        page.generation += 1;

        if address == self.config.home_address {
            page.state = PageState::Home;
            return None;
        }

        page.state = PageState::Loading {
            address: address.clone(),
        };

        Some(LoadRequest {
            generation: page.generation,
            address,
        })
    }

    /// Look up the site for a request on the calling thread.
    pub fn fetch(&self, request: &LoadRequest) -> LoadOutcome {
        lookup(self.sites.as_ref(), &request.address)
    }

    /// Look up the site on the blocking pool and apply the result.
    ///
    /// Returns whether the result was still current.
    pub async fn load(&self, request: LoadRequest) -> bool {
        let sites = Arc::clone(&self.sites);
        let address = request.address.clone();

        let outcome = match tokio::task::spawn_blocking(move || lookup(sites.as_ref(), &address))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(address = %request.address, error = %e, "Lookup task failed");
                LoadOutcome::Failed
            }
        };

        self.apply(&request, outcome)
    }

    /// Show a lookup result unless a newer navigation has happened since.
    pub fn apply(&self, request: &LoadRequest, outcome: LoadOutcome) -> bool {
        let mut page = self.page.write();

        if page.generation != request.generation {
            tracing::debug!(
                address = %request.address,
                generation = request.generation,
                current = page.generation,
                "Discarding stale lookup result"
            );
            return false;
        }

        let address = request.address.clone();
        page.state = match outcome {
            LoadOutcome::Found(site) => PageState::Loaded(site),
            LoadOutcome::NotFound => PageState::NotFound { address },
            LoadOutcome::Failed => PageState::Failed { address },
        };

        true
    }

    pub fn page(&self) -> PageState {
        self.page.read().state.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.page.read().state.error_message()
    }

    /// Sandboxed frame markup for the loaded site, if any.
    pub fn render_current(&self) -> Option<String> {
        match &self.page.read().state {
            PageState::Loaded(site) => Some(self.frame.render(&site.html_content)),
            _ => None,
        }
    }
}

fn lookup(sites: &dyn SiteStore, address: &str) -> LoadOutcome {
    match sites.find_by_address(address) {
        Ok(Some(site)) => LoadOutcome::Found(site),
        Ok(None) => {
            tracing::info!(address = %address, "Site not found");
            LoadOutcome::NotFound
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Load error");
            LoadOutcome::Failed
        }
    }
}
