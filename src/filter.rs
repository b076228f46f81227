//! Heuristic noise filter for registry domains.
//!
//! A domain is rejected when it is known not to resolve, when its top-level
//! label is outside the allowlist (or explicitly forbidden), when that label
//! is numeric, or when it contains any forbidden substring.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const DEFAULT_FORBIDDEN_SUBSTRINGS: &[&str] = &[
    "casino",
    "poker",
    "bet",
    "vulkan",
    "vegas",
    "rezka",
    "slot",
    "eldorado",
    "vavada",
    "fortuna",
    "vulcan",
    "prostitut",
    "777",
    "1x",
    "1w",
    "azino",
    "xn--",
    "gay",
    "porn",
    "kinovod",
    "sex",
    "seks",
];

const DEFAULT_FORBIDDEN_TLDS: &[&str] = &[
    "win",
    "sex",
    "ua",
    "kz",
    "рф",
    "fun",
    "cash",
    "quest",
    "rest",
    "best",
    "market",
    "adult",
    "africa",
    "agency",
    "apartments",
    "army",
    "audio",
    "autos",
    "baby",
    "band",
];

const DEFAULT_COMMON_TLDS: &[&str] = &[
    "com", "org", "net", "info", "gov", "edu", "co", "ai", "io", "me", "cc",
];

/// Static filter tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Substrings that reject a domain wherever they occur (case-sensitive)
    pub forbidden_substrings: Vec<String>,
    /// Top-level labels rejected even if allowlisted
    pub forbidden_tlds: HashSet<String>,
    /// Allowlist of top-level labels
    pub common_tlds: HashSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            forbidden_substrings: DEFAULT_FORBIDDEN_SUBSTRINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            forbidden_tlds: DEFAULT_FORBIDDEN_TLDS.iter().map(|s| s.to_string()).collect(),
            common_tlds: DEFAULT_COMMON_TLDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Why a domain was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// Listed as known-nonexistent
    Denylisted,
    /// Top-level label not allowlisted or explicitly forbidden
    Tld,
    /// Top-level label is all digits
    NumericTld,
    /// Contains a forbidden substring
    Substring,
}

/// Domain filter over a denylist and the static tables
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    denylist: HashSet<String>,
    config: FilterConfig,
}

impl DomainFilter {
    /// Create a filter from a denylist of known-nonexistent domains
    pub fn new(denylist: HashSet<String>, config: FilterConfig) -> Self {
        Self { denylist, config }
    }

    /// Number of denylisted domains
    pub fn denylist_len(&self) -> usize {
        self.denylist.len()
    }

    /// Returns true when `domain` must be excluded from the output.
    ///
    /// `domain` is expected to contain at least one dot.
    pub fn check(&self, domain: &str) -> bool {
        self.exclusion(domain).is_some()
    }

    /// First matching exclusion reason, or `None` if the domain is accepted
    pub fn exclusion(&self, domain: &str) -> Option<Exclusion> {
        if self.denylist.contains(domain) {
            return Some(Exclusion::Denylisted);
        }

        let tld = top_level_label(domain);
        if !self.config.common_tlds.contains(tld) || self.config.forbidden_tlds.contains(tld) {
            return Some(Exclusion::Tld);
        }

        if is_numeric(tld) {
            return Some(Exclusion::NumericTld);
        }

        if self
            .config
            .forbidden_substrings
            .iter()
            .any(|s| domain.contains(s.as_str()))
        {
            return Some(Exclusion::Substring);
        }

        None
    }
}

/// Label after the last dot, or the whole string if there is none
pub fn top_level_label(domain: &str) -> &str {
    match domain.rfind('.') {
        Some(idx) => &domain[idx + 1..],
        None => domain,
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}
