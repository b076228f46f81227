use std::ffi::OsString;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, RulesError};
use crate::types::RuleType;

/// Format a single rule line (without the newline)
pub fn format_rule(rule_type: RuleType, value: &str) -> String {
    format!("{},{}", rule_type.as_str(), value)
}

/// Serialize rules, one `<TYPE>,<value>` line each
pub fn write_rules_to<W: Write>(out: W, rule_type: RuleType, items: &[String]) -> Result<()> {
    let mut writer = BufWriter::new(out);
    for item in items {
        writeln!(writer, "{}", format_rule(rule_type, item))?;
    }
    writer.flush()?;
    Ok(())
}

/// Path of the temporary sibling a list is written to before it replaces `path`
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// A rule list fully written to its staging file, not yet in place
#[derive(Debug)]
pub struct StagedList {
    path: PathBuf,
    tmp_path: PathBuf,
    rules: usize,
}

impl StagedList {
    /// Move the staged file over the target
    pub fn commit(self) -> Result<()> {
        if let Err(e) = fs::rename(&self.tmp_path, &self.path) {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e.into());
        }
        tracing::info!(path = %self.path.display(), rules = self.rules, "written");
        Ok(())
    }

    /// Drop the staged file, leaving the target untouched
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp_path);
    }
}

/// Write a rule list to the staging sibling of `path`.
///
/// The target itself is not touched until [`StagedList::commit`]. A target
/// that exists as a directory is rejected here, since it could never be
/// replaced.
pub fn stage_rules(path: &Path, rule_type: RuleType, items: &[String]) -> Result<StagedList> {
    let _span = tracing::info_span!("stage_rules", path = %path.display()).entered();

    if path.is_dir() {
        return Err(RulesError::IoError(io::Error::other(format!(
            "output '{}' is a directory",
            path.display()
        ))));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = staging_path(path);
    let result = fs::File::create(&tmp_path)
        .map_err(RulesError::from)
        .and_then(|file| write_rules_to(file, rule_type, items));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    tracing::debug!(rules = items.len(), rule_type = %rule_type, "staged");
    Ok(StagedList {
        path: path.to_path_buf(),
        tmp_path,
        rules: items.len(),
    })
}

/// Write a rule list file.
///
/// Data goes to a `.tmp` sibling first and is renamed into place, so a
/// failed write never leaves a truncated list behind.
pub fn write_rules(path: &Path, rule_type: RuleType, items: &[String]) -> Result<()> {
    stage_rules(path, rule_type, items)?.commit()
}
