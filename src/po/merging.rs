//! Merging: reconcile a reference catalog against newly extracted entries.
//!
//! The reference is the catalog produced by the latest extraction; the
//! extracted sequences are prior translations being carried forward. The
//! result is a new file — neither input is touched. Entries whose id
//! approximately matches a reference id are flagged fuzzy (the old
//! translation is a useful starting point); entries the reference no longer
//! knows at all are marked obsolete.

use log::debug;

use crate::po::entries::Entries;
use crate::po::file::File;
use crate::po::similarity;

/// Which total order, if any, a merge result is left in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Group by file, order by line — the composite order.
    #[default]
    All,
    Id,
    File,
    Line,
    Fuzzy,
    Obsolete,
    /// Leave the combined order as built.
    None,
}

impl SortMode {
    pub fn apply(self, entries: &mut Entries) {
        match self {
            SortMode::All => entries.sort(),
            SortMode::Id => entries.sort_by_id(),
            SortMode::File => entries.sort_by_file(),
            SortMode::Line => entries.sort_by_line(),
            SortMode::Fuzzy => entries.sort_by_fuzzy(),
            SortMode::Obsolete => entries.sort_by_obsolete(),
            SortMode::None => {}
        }
    }
}

/// Merge settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    /// Flag near-miss ids fuzzy instead of letting them go obsolete.
    pub fuzzy_match: bool,
    /// Record the reference id a fuzzy entry matched in its previous-id
    /// comments.
    pub keep_previous_ids: bool,
    pub sort: SortMode,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            fuzzy_match: true,
            keep_previous_ids: false,
            sort: SortMode::All,
        }
    }
}

impl File {
    /// Merges with the default configuration.
    pub fn merge(&self, extracted: &[Entries]) -> File {
        self.merge_with_config(MergeConfig::default(), extracted)
    }

    /// Reconciles this reference catalog against the extracted sequences.
    ///
    /// The combined set starts as a copy of the reference entries with every
    /// extracted sequence appended in order, no deduplication. Fuzzy
    /// flagging and obsolescence marking then run over the combined set;
    /// fuzzy entries are exempt from obsolescence. Pure: both inputs are
    /// left unmodified.
    pub fn merge_with_config(&self, config: MergeConfig, extracted: &[Entries]) -> File {
        let mut combined = self.entries.clone();
        for entries in extracted {
            combined.extend(entries.iter().cloned());
        }
        debug!(
            "merging {} reference + {} extracted entries",
            self.entries.len(),
            combined.len() - self.entries.len(),
        );

        if config.fuzzy_match {
            for entry in combined.iter_mut() {
                for reference in self.entries.iter() {
                    if entry.context != reference.context {
                        continue;
                    }
                    if similarity::similar_but_not_identical(&entry.id, &reference.id) {
                        entry.mark_fuzzy();
                        if config.keep_previous_ids && !entry.previous.contains(&reference.id) {
                            entry.previous.push(reference.id.clone());
                        }
                    }
                }
            }
        }

        for entry in combined.iter_mut() {
            if entry.is_fuzzy() {
                continue;
            }
            if !self.entries.contains_unified_id(&entry.unified_id()) {
                entry.obsolete = true;
            }
        }

        config.sort.apply(&mut combined);

        File {
            name: self.name.clone(),
            entries: combined,
        }
    }
}
