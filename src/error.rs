use thiserror::Error;

/// Classifies download errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection, TLS or timeout failure before a response arrived
    Transport,
    /// Server answered with a non-success status
    Status,
    /// Response body could not be decompressed or decoded
    Decode,
    /// No data is available for the requested URL
    NotFound,
}

/// Rule generation error types
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Fetch error for {url}: {message}")]
    FetchError {
        kind: FetchErrorKind,
        url: String,
        message: String,
    },

    #[error("Read error in {resource} at line {line}: {message}")]
    ReadErrorAtLine {
        resource: String,
        line: u64,
        message: String,
    },

    #[error("Unexpected number of fields ({fields}) at line {line}")]
    MalformedRecord { line: u64, fields: usize },

    #[error("Parse error in {resource} at line {line}: {message}")]
    ParseErrorAtLine {
        resource: String,
        line: u64,
        message: String,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RulesError {
    pub(crate) fn fetch(kind: FetchErrorKind, url: &str, message: impl Into<String>) -> Self {
        RulesError::FetchError {
            kind,
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Line number the error points at, if it is tied to a position in a source.
    pub fn line(&self) -> Option<u64> {
        match self {
            RulesError::ReadErrorAtLine { line, .. }
            | RulesError::MalformedRecord { line, .. }
            | RulesError::ParseErrorAtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RulesError>;
