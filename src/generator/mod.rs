//! Rule generators, one per kind of upstream list.

mod domains;
mod dump;
mod ips;

pub use domains::DomainListGenerator;
pub use dump::{DumpGenerator, DEFAULT_DUMP_URL, DEFAULT_NXDOMAIN_URL};
pub use ips::IpListGenerator;

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

use crate::error::{Result, RulesError};
use crate::fetch::Fetcher;
use crate::types::Rules;

/// Trait for producing rules from an upstream source
pub trait Generator {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch the source and build its rules
    fn generate(&self, fetcher: &dyn Fetcher) -> Result<Rules>;
}

/// Call `f` with every line of `input` and its 1-based number.
///
/// Read failures are reported against `resource` at the line being read.
pub(crate) fn for_each_line<R, F>(input: R, resource: &str, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(u64, &str) -> Result<()>,
{
    let mut reader = BufReader::new(input);
    let mut line = String::new();
    let mut line_num = 0u64;

    loop {
        line.clear();
        line_num += 1;
        let read = reader
            .read_line(&mut line)
            .map_err(|e| RulesError::ReadErrorAtLine {
                resource: resource.to_string(),
                line: line_num,
                message: e.to_string(),
            })?;
        if read == 0 {
            return Ok(());
        }
        let text = line.strip_suffix('\n').unwrap_or(&line);
        let text = text.strip_suffix('\r').unwrap_or(text);
        f(line_num, text)?;
    }
}

/// Meaningful entry of a plain list line: trimmed, blank and `#` lines dropped
pub(crate) fn list_entry(line: &str) -> Option<&str> {
    let entry = line.trim();
    if entry.is_empty() || entry.starts_with('#') {
        None
    } else {
        Some(entry)
    }
}

/// Load a newline-delimited denylist, one domain per line taken verbatim
pub fn load_denylist(fetcher: &dyn Fetcher, url: &str) -> Result<HashSet<String>> {
    let mut denylist = HashSet::new();
    for_each_line(fetcher.fetch(url)?, url, |_, line| {
        if !line.is_empty() {
            denylist.insert(line.to_string());
        }
        Ok(())
    })?;
    log::info!("{}: {} known-nonexistent domains", url, denylist.len());
    Ok(denylist)
}
