use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::Duration;

use crate::error::{FetchErrorKind, Result, RulesError};

/// Default timeout for a whole download
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for retrieving remote list files
pub trait Fetcher {
    /// Open the resource at `url` as a byte stream
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>>;
}

/// HTTP(S) fetcher backed by a blocking `ureq` agent
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher whose downloads fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>> {
        tracing::info!(url, "downloading");

        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                RulesError::fetch(FetchErrorKind::Status, url, format!("HTTP status {}", code))
            }
            other => RulesError::fetch(FetchErrorKind::Transport, url, other.to_string()),
        })?;

        let (_, body) = response.into_parts();
        Ok(Box::new(body.into_reader()))
    }
}

/// Fetcher that has nothing to offer
pub struct NilFetcher;

impl Fetcher for NilFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>> {
        Err(RulesError::fetch(
            FetchErrorKind::NotFound,
            url,
            "fetching is disabled",
        ))
    }
}

/// In-memory fetcher for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(url.into(), data.into());
    }

    pub fn with_file(mut self, url: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(url, data);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>> {
        let data = self
            .files
            .get(url)
            .ok_or_else(|| RulesError::fetch(FetchErrorKind::NotFound, url, "no such file"))?;
        Ok(Box::new(Cursor::new(data.clone())))
    }
}
