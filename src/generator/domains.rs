use crate::error::Result;
use crate::fetch::Fetcher;
use crate::trie::minimize_suffixes;
use crate::types::Rules;

use super::{for_each_line, list_entry, Generator};

/// Generator for plain newline-delimited domain lists
#[derive(Debug, Clone)]
pub struct DomainListGenerator {
    name: String,
    url: String,
}

impl DomainListGenerator {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Generator for DomainListGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, fetcher: &dyn Fetcher) -> Result<Rules> {
        let mut domains = Vec::new();
        for_each_line(fetcher.fetch(&self.url)?, &self.url, |_, line| {
            if let Some(entry) = list_entry(line) {
                domains.push(entry.trim_end_matches('.').to_lowercase());
            }
            Ok(())
        })?;

        let domain_suffixes = minimize_suffixes(&domains);
        log::info!(
            "{}: {} entries minimized to {} suffix rules",
            self.name,
            domains.len(),
            domain_suffixes.len()
        );

        Ok(Rules {
            domain_suffixes,
            ..Rules::default()
        })
    }
}
