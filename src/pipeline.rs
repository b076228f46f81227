use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::types::{RuleType, Rules};
use crate::writer::{stage_rules, StagedList};

/// A rule list file produced by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenList {
    pub source: String,
    pub path: PathBuf,
    pub rule_type: RuleType,
    pub rules: usize,
}

/// Generate every configured source, then write every output.
///
/// Nothing is written unless all sources were generated successfully, and
/// no existing list is replaced unless every output was staged.
pub fn run(config: &Config, fetcher: &dyn Fetcher) -> Result<Vec<WrittenList>> {
    config.validate()?;

    let mut generated: Vec<Rules> = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let _span = tracing::info_span!("generate", source = source.name()).entered();
        let rules = source.generator(&config.filter).generate(fetcher)?;
        generated.push(rules);
    }

    let mut staged: Vec<StagedList> = Vec::new();
    let mut written = Vec::new();
    for (source, rules) in config.sources.iter().zip(&generated) {
        for (output, rule_type) in source.outputs() {
            let path = config.output_dir.join(output);
            let items = rules.items(rule_type);
            match stage_rules(&path, rule_type, items) {
                Ok(list) => staged.push(list),
                Err(e) => {
                    staged.into_iter().for_each(StagedList::discard);
                    return Err(e);
                }
            }
            written.push(WrittenList {
                source: source.name().to_string(),
                path,
                rule_type,
                rules: items.len(),
            });
        }
    }

    let mut pending = staged.into_iter();
    while let Some(list) = pending.next() {
        if let Err(e) = list.commit() {
            pending.for_each(StagedList::discard);
            return Err(e);
        }
    }

    Ok(written)
}
