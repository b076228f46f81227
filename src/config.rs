//! Run configuration.
//!
//! Loaded from JSON; every field has a default, so `{}` is a valid file and
//! reproduces the stock source set.
//!
//! ```json
//! {
//!   "output_dir": "output",
//!   "sources": [
//!     { "kind": "dump", "name": "antizapret", "output": "antizapret_domain_suffixes.lst" },
//!     { "kind": "domains", "name": "extra", "url": "https://example.com/hosts.txt",
//!       "output": "extra_domain_suffixes.lst" },
//!     { "kind": "ips", "name": "nets", "url": "https://example.com/ips.txt",
//!       "output": "nets_ips.lst" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};
use crate::fetch::DEFAULT_TIMEOUT;
use crate::filter::FilterConfig;
use crate::generator::{
    DomainListGenerator, DumpGenerator, Generator, IpListGenerator, DEFAULT_DUMP_URL,
    DEFAULT_NXDOMAIN_URL,
};
use crate::types::RuleType;

const NO_RUSSIA_URL: &str =
    "https://raw.githubusercontent.com/dartraiden/no-russia-hosts/refs/heads/master/hosts.txt";

const GUBERNIEV_DOMAINS_URL: &str = "https://raw.githubusercontent.com/GubernievS/AntiZapret-VPN/refs/heads/main/setup/root/antizapret/download/include-hosts.txt";

const GUBERNIEV_IPS_URL: &str = "https://raw.githubusercontent.com/GubernievS/AntiZapret-VPN/refs/heads/main/setup/root/antizapret/download/include-ips.txt";

/// Default directory for generated lists
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default download timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

fn default_dump_url() -> String {
    DEFAULT_DUMP_URL.to_string()
}

fn default_nxdomain_url() -> String {
    DEFAULT_NXDOMAIN_URL.to_string()
}

/// One upstream list and the files generated from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Registry dump with its known-nonexistent domain list
    Dump {
        name: String,
        #[serde(default = "default_dump_url")]
        dump_url: String,
        #[serde(default = "default_nxdomain_url")]
        nxdomain_url: String,
        /// File for DOMAIN_SUFFIX rules
        output: String,
        /// Optional file for the unminimized DOMAIN rules
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domains_output: Option<String>,
    },
    /// Plain domain list
    Domains {
        name: String,
        url: String,
        output: String,
    },
    /// Plain IP/CIDR list
    Ips {
        name: String,
        url: String,
        output: String,
    },
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::Dump { name, .. }
            | SourceConfig::Domains { name, .. }
            | SourceConfig::Ips { name, .. } => name,
        }
    }

    /// URLs this source downloads
    pub fn urls(&self) -> Vec<&str> {
        match self {
            SourceConfig::Dump {
                dump_url,
                nxdomain_url,
                ..
            } => vec![dump_url.as_str(), nxdomain_url.as_str()],
            SourceConfig::Domains { url, .. } | SourceConfig::Ips { url, .. } => vec![url.as_str()],
        }
    }

    /// Output files and the rule type written to each
    pub fn outputs(&self) -> Vec<(&str, RuleType)> {
        match self {
            SourceConfig::Dump {
                output,
                domains_output,
                ..
            } => {
                let mut outputs = vec![(output.as_str(), RuleType::DomainSuffix)];
                if let Some(domains_output) = domains_output {
                    outputs.push((domains_output.as_str(), RuleType::Domain));
                }
                outputs
            }
            SourceConfig::Domains { output, .. } => vec![(output.as_str(), RuleType::DomainSuffix)],
            SourceConfig::Ips { output, .. } => vec![(output.as_str(), RuleType::IpCidr)],
        }
    }

    /// Build the generator for this source
    pub fn generator(&self, filter: &FilterConfig) -> Box<dyn Generator> {
        match self {
            SourceConfig::Dump {
                name,
                dump_url,
                nxdomain_url,
                ..
            } => Box::new(
                DumpGenerator::new()
                    .with_name(name.clone())
                    .with_dump_url(dump_url.clone())
                    .with_nxdomain_url(nxdomain_url.clone())
                    .with_filter_config(filter.clone()),
            ),
            SourceConfig::Domains { name, url, .. } => {
                Box::new(DomainListGenerator::new(name.clone(), url.clone()))
            }
            SourceConfig::Ips { name, url, .. } => {
                Box::new(IpListGenerator::new(name.clone(), url.clone()))
            }
        }
    }
}

/// Top-level run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the rule lists are written to
    pub output_dir: PathBuf,
    /// Timeout for each download
    pub timeout_secs: u64,
    /// Static filter tables for dump sources
    pub filter: FilterConfig,
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            filter: FilterConfig::default(),
            sources: vec![
                SourceConfig::Dump {
                    name: "antizapret".to_string(),
                    dump_url: default_dump_url(),
                    nxdomain_url: default_nxdomain_url(),
                    output: "antizapret_domain_suffixes.lst".to_string(),
                    domains_output: None,
                },
                SourceConfig::Domains {
                    name: "no-russia".to_string(),
                    url: NO_RUSSIA_URL.to_string(),
                    output: "no_russia_domain_suffixes.lst".to_string(),
                },
                SourceConfig::Domains {
                    name: "guberniev-domains".to_string(),
                    url: GUBERNIEV_DOMAINS_URL.to_string(),
                    output: "guberniev_domain_suffixes.lst".to_string(),
                },
                SourceConfig::Ips {
                    name: "guberniev-ips".to_string(),
                    url: GUBERNIEV_IPS_URL.to_string(),
                    output: "guberniev_ips.lst".to_string(),
                },
            ],
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            RulesError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject configurations that cannot produce a complete run
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(RulesError::ConfigError("no sources configured".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(RulesError::ConfigError("timeout must be positive".to_string()));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for source in &self.sources {
            if !names.insert(source.name()) {
                return Err(RulesError::ConfigError(format!(
                    "duplicate source name: {}",
                    source.name()
                )));
            }
            if source.urls().iter().any(|url| url.trim().is_empty()) {
                return Err(RulesError::ConfigError(format!(
                    "source {} has an empty URL",
                    source.name()
                )));
            }
            for (output, _) in source.outputs() {
                if output.trim().is_empty() {
                    return Err(RulesError::ConfigError(format!(
                        "source {} has an empty output name",
                        source.name()
                    )));
                }
                if !outputs.insert(output) {
                    return Err(RulesError::ConfigError(format!(
                        "output {} is written by more than one source",
                        output
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_sources() {
        let config = Config::from_json(
            r#"{
                "output_dir": "/tmp/rules",
                "sources": [
                    { "kind": "dump", "name": "rkn", "output": "rkn.lst",
                      "domains_output": "rkn_domains.lst" },
                    { "kind": "domains", "name": "hosts", "url": "https://example.com/h",
                      "output": "hosts.lst" },
                    { "kind": "ips", "name": "nets", "url": "https://example.com/i",
                      "output": "nets.lst" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/rules"));
        assert_eq!(config.sources.len(), 3);
        match &config.sources[0] {
            SourceConfig::Dump {
                dump_url,
                domains_output,
                ..
            } => {
                assert_eq!(dump_url, DEFAULT_DUMP_URL);
                assert_eq!(domains_output.as_deref(), Some("rkn_domains.lst"));
            }
            other => panic!("expected dump source, got {:?}", other),
        }
        assert_eq!(
            config.sources[0].outputs(),
            vec![("rkn.lst", RuleType::DomainSuffix), ("rkn_domains.lst", RuleType::Domain)]
        );
        assert_eq!(config.sources[2].outputs(), vec![("nets.lst", RuleType::IpCidr)]);
        assert_eq!(config.sources[1].generator(&config.filter).name(), "hosts");
    }

    #[test]
    fn test_rejects_empty_sources() {
        let err = Config::from_json(r#"{"sources": []}"#).unwrap_err();
        assert!(matches!(err, RulesError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_duplicate_outputs() {
        let err = Config::from_json(
            r#"{"sources": [
                { "kind": "domains", "name": "a", "url": "https://a", "output": "same.lst" },
                { "kind": "ips", "name": "b", "url": "https://b", "output": "same.lst" }
            ]}"#,
        )
        .unwrap_err();
        assert!(format!("{}", err).contains("same.lst"), "got: {}", err);
    }

    #[test]
    fn test_rejects_duplicate_names_and_empty_urls() {
        let dup = Config::from_json(
            r#"{"sources": [
                { "kind": "domains", "name": "a", "url": "https://a", "output": "a.lst" },
                { "kind": "domains", "name": "a", "url": "https://b", "output": "b.lst" }
            ]}"#,
        );
        assert!(dup.is_err());

        let empty_url = Config::from_json(
            r#"{"sources": [{ "kind": "ips", "name": "a", "url": " ", "output": "a.lst" }]}"#,
        );
        assert!(empty_url.is_err());
    }

    #[test]
    fn test_unknown_kind_is_json_error() {
        let err = Config::from_json(r#"{"sources": [{ "kind": "ftp", "name": "a" }]}"#)
            .unwrap_err();
        assert!(matches!(err, RulesError::JsonError(_)));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let text = Config::default().to_json().unwrap();
        assert_eq!(Config::from_json(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/proxy-rules.json").unwrap_err();
        assert!(matches!(err, RulesError::ConfigError(_)));
    }
}
