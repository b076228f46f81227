use flate2::read::GzDecoder;

use crate::error::Result;
use crate::extract::extract_dump;
use crate::fetch::Fetcher;
use crate::filter::{DomainFilter, FilterConfig};
use crate::trie::minimize_suffixes;
use crate::types::Rules;

use super::{load_denylist, Generator};

/// Registry dump (gzip-compressed, Windows-1251, `;`-separated)
pub const DEFAULT_DUMP_URL: &str =
    "https://raw.githubusercontent.com/zapret-info/z-i/master/dump.csv.gz";

/// Domains from the dump known not to resolve
pub const DEFAULT_NXDOMAIN_URL: &str =
    "https://raw.githubusercontent.com/zapret-info/z-i/master/nxdomain.txt";

/// Generator for the registry dump: filter, deduplicate, minimize
#[derive(Debug, Clone)]
pub struct DumpGenerator {
    name: String,
    dump_url: String,
    nxdomain_url: String,
    filter_config: FilterConfig,
}

impl DumpGenerator {
    /// Create a generator for the default registry locations
    pub fn new() -> Self {
        Self {
            name: "dump".to_string(),
            dump_url: DEFAULT_DUMP_URL.to_string(),
            nxdomain_url: DEFAULT_NXDOMAIN_URL.to_string(),
            filter_config: FilterConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set custom dump URL
    pub fn with_dump_url(mut self, url: impl Into<String>) -> Self {
        self.dump_url = url.into();
        self
    }

    /// Set custom known-nonexistent domain list URL
    pub fn with_nxdomain_url(mut self, url: impl Into<String>) -> Self {
        self.nxdomain_url = url.into();
        self
    }

    /// Replace the static filter tables
    pub fn with_filter_config(mut self, config: FilterConfig) -> Self {
        self.filter_config = config;
        self
    }
}

impl Default for DumpGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for DumpGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, fetcher: &dyn Fetcher) -> Result<Rules> {
        let denylist = load_denylist(fetcher, &self.nxdomain_url)?;
        let filter = DomainFilter::new(denylist, self.filter_config.clone());
        let denylisted = filter.denylist_len();

        let body = fetcher.fetch(&self.dump_url)?;
        let extraction = extract_dump(GzDecoder::new(body), &self.dump_url, filter)?;

        let domain_suffixes = minimize_suffixes(&extraction.domains);
        let mut domains: Vec<String> = extraction.domains.into_iter().collect();
        domains.sort_unstable();

        log::info!(
            "{}: {} domains minimized to {} suffix rules ({} denylisted entries, {} hits)",
            self.name,
            domains.len(),
            domain_suffixes.len(),
            denylisted,
            extraction.stats.denylisted
        );

        Ok(Rules {
            domains,
            domain_suffixes,
            ip_nets: Vec::new(),
        })
    }
}
