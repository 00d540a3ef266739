//! Domain parsing and validation
//!
//! An address is a letters-only name followed by a TLD. A TLD is either one of
//! the named suffixes in [`VALID_TLDS`] or a dot plus a two-letter code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::Result;

/// Named TLDs accepted in addition to two-letter codes.
pub const VALID_TLDS: [&str; 3] = [".topal", ".magic", ".aura"];

/// Appended to input that has no dot at all.
pub const DEFAULT_TLD: &str = ".topal";

/// A canonical `name + tld` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    name: String,
    tld: String,
}

impl Address {
    /// Split an address into name and TLD, or `None` if it doesn't have either form.
    pub fn parse(input: &str) -> Option<Self> {
        extract_domain_and_tld(input)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The TLD including its leading dot.
    pub fn tld(&self) -> &str {
        &self.tld
    }

    /// Whether the TLD is one of the named suffixes rather than a two-letter code.
    pub fn has_named_tld(&self) -> bool {
        VALID_TLDS.contains(&self.tld.as_str())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.tld)
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = validate_full_domain(s)?;
        extract_domain_and_tld(&normalized).ok_or(ValidationError::InvalidFormat)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_two_letter_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_lowercase())
}

/// True for allow-listed TLDs and for `.` followed by exactly two lowercase letters.
pub fn is_valid_tld(tld: &str) -> bool {
    if VALID_TLDS.contains(&tld) {
        return true;
    }

    tld.strip_prefix('.').is_some_and(is_two_letter_code)
}

/// Split a full address into its name and TLD.
///
/// Named TLDs are tried first; otherwise the text after the last dot must be a
/// two-letter code. Names must be letters only in both cases.
pub fn extract_domain_and_tld(full: &str) -> Option<Address> {
    let lower = full.trim().to_lowercase();

    for tld in VALID_TLDS {
        if let Some(name) = lower.strip_suffix(tld) {
            if is_valid_name(name) {
                return Some(Address {
                    name: name.to_string(),
                    tld: tld.to_string(),
                });
            }
        }
    }

    let dot = lower.rfind('.')?;
    if dot == 0 || dot == lower.len() - 1 {
        return None;
    }

    let (name, code) = (&lower[..dot], &lower[dot + 1..]);
    if is_valid_name(name) && is_two_letter_code(code) {
        return Some(Address {
            name: name.to_string(),
            tld: format!(".{code}"),
        });
    }

    None
}

/// Normalize raw input into an address, appending [`DEFAULT_TLD`] to bare names.
pub fn canonicalize(raw: &str) -> Option<Address> {
    canonicalize_with_default(raw, DEFAULT_TLD)
}

pub(crate) fn canonicalize_with_default(raw: &str, default_tld: &str) -> Option<Address> {
    extract_domain_and_tld(&with_default_tld(raw, default_tld))
}

/// Trim and lowercase, appending `default_tld` when the input has no dot.
pub(crate) fn with_default_tld(raw: &str, default_tld: &str) -> String {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() || normalized.contains('.') {
        normalized
    } else {
        format!("{normalized}{default_tld}")
    }
}

/// Validate the name part of an address.
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(ValidationError::Required);
    }

    if !is_valid_name(domain) {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(())
}

/// Validate a full address and return its canonical form.
pub fn validate_full_domain(full: &str) -> Result<String> {
    if full.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    let address = canonicalize(full).ok_or(ValidationError::InvalidFormat)?;
    validate_domain(address.name())?;

    Ok(address.to_string())
}

/// Reduce typed text to the characters a name may contain.
pub fn sanitize_domain_input(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}
