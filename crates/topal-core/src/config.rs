//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use topal_navigation::{canonicalize, is_valid_tld, DEFAULT_TLD};

use crate::error::CoreError;
use crate::Result;

/// Overrides `database_path` when set.
const DATABASE_PATH_ENV: &str = "TOPAL_DATABASE_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Address of the Deploy Cloud home view; never looked up
    pub home_address: String,
    /// Suffix appended to bare names typed in the address bar
    pub default_tld: String,
    /// Let deployed pages run scripts inside their sandbox
    pub allow_scripts: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("topal.db"),
            home_address: "deploy.core".to_string(),
            default_tld: DEFAULT_TLD.to_string(),
            allow_scripts: true,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Topal"))
            .unwrap_or_else(|| PathBuf::from(".topal"))
    }

    /// Load a JSON config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Config>(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        let config = config.with_database_override(std::env::var(DATABASE_PATH_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn with_database_override(mut self, path: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_tld(&self.default_tld) {
            return Err(CoreError::Config(format!(
                "default_tld is not a valid TLD: {}",
                self.default_tld
            )));
        }

        if self.home_address.trim().is_empty() {
            return Err(CoreError::Config("home_address cannot be empty".to_string()));
        }

        // A home address that parses as a site would shadow that site
        if canonicalize(&self.home_address).is_some() {
            return Err(CoreError::Config(format!(
                "home_address must not be a site address: {}",
                self.home_address
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
