//! Input resolution for the address bar
//!
//! 1. Empty input → ignored
//! 2. Parsable address → navigate to its canonical form
//! 3. Anything else → navigate to the normalized text as-is, so the lookup
//!    reports it as not found instead of blocking navigation

use serde::{Deserialize, Serialize};

use crate::domain::{canonicalize_with_default, with_default_tld, DEFAULT_TLD};

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputResolution {
    /// Nothing to do
    Ignore,
    /// Navigate to an address
    Navigate(String),
}

pub struct InputResolver {
    /// Suffix appended to bare names
    default_tld: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            default_tld: DEFAULT_TLD.to_string(),
        }
    }

    pub fn with_default_tld(default_tld: String) -> Self {
        Self { default_tld }
    }

    pub fn default_tld(&self) -> &str {
        &self.default_tld
    }

    /// Resolve user input into an action
    pub fn resolve(&self, input: &str) -> InputResolution {
        let normalized = with_default_tld(input, &self.default_tld);
        if normalized.is_empty() {
            return InputResolution::Ignore;
        }

        match canonicalize_with_default(&normalized, &self.default_tld) {
            Some(address) => InputResolution::Navigate(address.to_string()),
            None => {
                tracing::debug!(input = %normalized, "Input is not a valid address");
                InputResolution::Navigate(normalized)
            }
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_address() {
        let resolver = InputResolver::new();

        assert_eq!(
            resolver.resolve("MySite.Topal"),
            InputResolution::Navigate("mysite.topal".to_string())
        );
        assert_eq!(
            resolver.resolve("  foo.AB"),
            InputResolution::Navigate("foo.ab".to_string())
        );
    }

    #[test]
    fn test_resolve_bare_name() {
        let resolver = InputResolver::new();
        assert_eq!(
            resolver.resolve("blog"),
            InputResolution::Navigate("blog.topal".to_string())
        );

        let resolver = InputResolver::with_default_tld(".magic".to_string());
        assert_eq!(
            resolver.resolve("blog"),
            InputResolution::Navigate("blog.magic".to_string())
        );
    }

    #[test]
    fn test_resolve_empty() {
        let resolver = InputResolver::new();
        assert_eq!(resolver.resolve(""), InputResolution::Ignore);
        assert_eq!(resolver.resolve("   "), InputResolution::Ignore);
    }

    #[test]
    fn test_unparsable_input_kept_opaque() {
        let resolver = InputResolver::new();

        assert_eq!(
            resolver.resolve("Foo.ABC"),
            InputResolution::Navigate("foo.abc".to_string())
        );
        assert_eq!(
            resolver.resolve("deploy.core"),
            InputResolution::Navigate("deploy.core".to_string())
        );
        assert_eq!(
            resolver.resolve("site42"),
            InputResolution::Navigate("site42.topal".to_string())
        );
    }
}
