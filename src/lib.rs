//! Proxy Rules - minimal DOMAIN-SUFFIX rule lists from public block registries
//!
//! This library turns large upstream lists into compact rule files for
//! suffix-matching proxies and firewalls:
//! - Registry dump extraction (gzip, Windows-1251, `;`-separated records)
//! - Heuristic noise filtering (denylist, TLD allowlist, forbidden substrings)
//! - Suffix minimization with a reversed-domain trie
//! - Plain domain and IP/CIDR list normalization
//! - `<RULE_TYPE>,<value>` serialization
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use proxy_rules::{bare_domain, minimize_suffixes, DomainFilter, FilterConfig};
//!
//! let filter = DomainFilter::new(HashSet::new(), FilterConfig::default());
//!
//! let accepted: Vec<&str> = ["*.cdn.example.com", "mail.example.com", "casino-bonus.win", "example.org"]
//!     .into_iter()
//!     .map(bare_domain)
//!     .filter(|domain| !filter.check(domain))
//!     .collect();
//!
//! assert_eq!(minimize_suffixes(accepted), vec!["example.com", "example.org"]);
//! ```
//!
//! # Output Format
//!
//! | Rule type | Line |
//! |-----------|------|
//! | Domain suffix | `DOMAIN_SUFFIX,example.com` |
//! | Exact domain | `DOMAIN,example.com` |
//! | Network | `IP-CIDR,10.0.0.0/8` |

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod generator;
pub mod pipeline;
pub mod trie;
pub mod types;
pub mod writer;

// Re-export commonly used items
pub use config::{Config, SourceConfig};
pub use error::{FetchErrorKind, Result, RulesError};
pub use extract::{bare_domain, extract_dump, ExtractStats, Extraction, RecordExtractor};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher, NilFetcher, DEFAULT_TIMEOUT};
pub use filter::{DomainFilter, Exclusion, FilterConfig};
pub use generator::{DomainListGenerator, DumpGenerator, Generator, IpListGenerator};
pub use pipeline::{run, WrittenList};
pub use trie::{minimize_suffixes, SuffixTrie};
pub use types::{suffix_covers, RuleType, Rules};
pub use writer::{format_rule, write_rules};
