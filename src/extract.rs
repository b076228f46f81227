//! Registry dump extraction.
//!
//! The dump is a Windows-1251 encoded, `;`-separated table whose first line
//! is a header. Field 1 of each record holds a host pattern such as
//! `*.sub.example.com`; only its registrable part (`example.com`) is kept.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;

use csv::StringRecord;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::error::{FetchErrorKind, Result, RulesError};
use crate::filter::{top_level_label, DomainFilter, Exclusion};

/// Index of the host pattern field in a dump record
pub const PATTERN_FIELD: usize = 1;

/// Last two labels of a host pattern.
///
/// Everything up to and including the second dot from the right is dropped;
/// patterns with fewer than two dots are returned unchanged.
pub fn bare_domain(pattern: &str) -> &str {
    match pattern.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &pattern[idx + 1..],
        None => pattern,
    }
}

/// Counters collected during one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub records: usize,
    pub empty_patterns: usize,
    pub without_dot: usize,
    pub invalid_labels: usize,
    pub denylisted: usize,
    pub tld: usize,
    pub numeric_tld: usize,
    pub substring: usize,
    pub duplicates: usize,
    pub accepted: usize,
}

impl ExtractStats {
    /// Total number of filter rejections
    pub fn excluded(&self) -> usize {
        self.denylisted + self.tld + self.numeric_tld + self.substring
    }

    fn count_exclusion(&mut self, exclusion: Exclusion) {
        match exclusion {
            Exclusion::Denylisted => self.denylisted += 1,
            Exclusion::Tld => self.tld += 1,
            Exclusion::NumericTld => self.numeric_tld += 1,
            Exclusion::Substring => self.substring += 1,
        }
    }
}

/// Result of an extraction pass
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Accepted bare domains
    pub domains: HashSet<String>,
    /// Top-level labels seen among accepted domains
    pub tlds: BTreeSet<String>,
    pub stats: ExtractStats,
}

/// Turns dump records into the accepted domain set
#[derive(Debug)]
pub struct RecordExtractor {
    filter: DomainFilter,
    extraction: Extraction,
}

impl RecordExtractor {
    pub fn new(filter: DomainFilter) -> Self {
        Self {
            filter,
            extraction: Extraction::default(),
        }
    }

    /// Process one record read at `line`.
    ///
    /// Returns the accepted domain, if this record contributed one. A record
    /// with fewer than two fields means the dump layout changed and aborts
    /// the pass.
    pub fn push_record(&mut self, line: u64, record: &StringRecord) -> Result<Option<&str>> {
        if record.len() <= PATTERN_FIELD {
            return Err(RulesError::MalformedRecord {
                line,
                fields: record.len(),
            });
        }
        self.extraction.stats.records += 1;

        let pattern = &record[PATTERN_FIELD];
        if pattern.is_empty() {
            self.extraction.stats.empty_patterns += 1;
            return Ok(None);
        }

        let domain = bare_domain(pattern).to_lowercase();
        if !domain.contains('.') {
            log::debug!("line {}: pattern {:?} has no registrable domain", line, pattern);
            self.extraction.stats.without_dot += 1;
            return Ok(None);
        }
        if domain.split('.').any(|label| label.is_empty() || label.contains('*')) {
            log::debug!("line {}: pattern {:?} has an empty or wildcard label", line, pattern);
            self.extraction.stats.invalid_labels += 1;
            return Ok(None);
        }

        if let Some(exclusion) = self.filter.exclusion(&domain) {
            log::trace!("line {}: {} excluded ({:?})", line, domain, exclusion);
            self.extraction.stats.count_exclusion(exclusion);
            return Ok(None);
        }

        let extraction = &mut self.extraction;
        extraction
            .tlds
            .insert(top_level_label(&domain).to_string());
        if extraction.domains.contains(&domain) {
            extraction.stats.duplicates += 1;
        } else {
            extraction.stats.accepted += 1;
            extraction.domains.insert(domain.clone());
        }
        Ok(extraction.domains.get(&domain).map(String::as_str))
    }

    /// Domains accepted so far
    pub fn domains(&self) -> &HashSet<String> {
        &self.extraction.domains
    }

    pub fn stats(&self) -> &ExtractStats {
        &self.extraction.stats
    }

    pub fn finish(self) -> Extraction {
        self.extraction
    }
}

/// Wrap a Windows-1251 byte stream into a UTF-8 reader
pub fn decode_windows_1251<R: Read>(input: R) -> DecodeReaderBytes<R, Vec<u8>> {
    DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::WINDOWS_1251))
        .build(input)
}

/// Read a whole dump (already decompressed, still Windows-1251) and extract
/// the accepted domain set. `resource` names the source in errors.
pub fn extract_dump<R: Read>(input: R, resource: &str, filter: DomainFilter) -> Result<Extraction> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(decode_windows_1251(input));

    let mut record = StringRecord::new();

    // Header line
    reader
        .read_record(&mut record)
        .map_err(|e| read_error(resource, 1, &e))?;

    let mut extractor = RecordExtractor::new(filter);
    loop {
        let next_line = reader.position().line();
        let more = reader
            .read_record(&mut record)
            .map_err(|e| read_error(resource, next_line, &e))?;
        if !more {
            break;
        }
        let line = record.position().map_or(next_line, |p| p.line());
        extractor.push_record(line, &record)?;
    }

    let extraction = extractor.finish();
    let stats = &extraction.stats;
    log::info!(
        "{}: {} records, {} accepted, {} duplicates, {} excluded, {} empty patterns, {} unusable",
        resource,
        stats.records,
        stats.accepted,
        stats.duplicates,
        stats.excluded(),
        stats.empty_patterns,
        stats.without_dot + stats.invalid_labels
    );
    log::info!("{}: accepted TLDs {:?}", resource, extraction.tlds);
    Ok(extraction)
}

/// A stream that cannot be decompressed surfaces as invalid-data I/O; that
/// is a decode failure of the download, everything else is a read error.
fn read_error(resource: &str, fallback_line: u64, err: &csv::Error) -> RulesError {
    let line = err.position().map_or(fallback_line, |p| p.line());
    if let csv::ErrorKind::Io(io_err) = err.kind() {
        if matches!(
            io_err.kind(),
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::InvalidInput
        ) {
            return RulesError::fetch(
                FetchErrorKind::Decode,
                resource,
                format!("line {}: {}", line, io_err),
            );
        }
    }
    RulesError::ReadErrorAtLine {
        resource: resource.to_string(),
        line,
        message: err.to_string(),
    }
}
