//! The entry collection and its domain operations: deduplication, sorting,
//! fuzzy lookup.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::po::entry::{self, Entry};
use crate::po::similarity;

/// An ordered collection of catalog entries.
///
/// Order is meaningful: it is the order entries appear in a catalog file,
/// and every operation here either preserves it or documents the order it
/// establishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries(pub Vec<Entry>);

impl Deref for Entries {
    type Target = Vec<Entry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Entries {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Entry>> for Entries {
    fn from(entries: Vec<Entry>) -> Self {
        Entries(entries)
    }
}

impl FromIterator<Entry> for Entries {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Entries(iter.into_iter().collect())
    }
}

impl IntoIterator for Entries {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Entries {
    pub fn new() -> Self {
        Entries(Vec::new())
    }

    pub fn contains_entry(&self, entry: &Entry) -> bool {
        self.0.iter().any(|e| e == entry)
    }

    pub fn contains_unified_id(&self, uid: &str) -> bool {
        self.0.iter().any(|e| e.unified_id() == uid)
    }

    pub fn index_of(&self, entry: &Entry) -> Option<usize> {
        self.0.iter().position(|e| e == entry)
    }

    pub fn index_by_unified_id(&self, uid: &str) -> Option<usize> {
        self.0.iter().position(|e| e.unified_id() == uid)
    }

    pub fn index_by_id_and_context(&self, id: &str, context: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|e| e.id == id && e.context == context)
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashMap::new();
        self.0
            .iter()
            .any(|e| seen.insert(e.unified_id(), ()).is_some())
    }

    /// Removes duplicate entries with the same unified id, appending the
    /// locations of later occurrences to the first one. First-seen order is
    /// preserved. Header entries (empty id) are never merged with anything.
    pub fn clean_duplicates(&self) -> Entries {
        let mut cleaned: Vec<Entry> = Vec::with_capacity(self.0.len());
        let mut seen: HashMap<String, usize> = HashMap::new();

        for entry in &self.0 {
            if entry.id.is_empty() {
                cleaned.push(entry.clone());
                continue;
            }
            match seen.get(&entry.unified_id()) {
                Some(&index) => {
                    cleaned[index].locations.extend(entry.locations.iter().cloned());
                }
                None => {
                    seen.insert(entry.unified_id(), cleaned.len());
                    cleaned.push(entry.clone());
                }
            }
        }

        Entries(cleaned)
    }

    /// Drops every entry marked obsolete.
    pub fn clean_obsoletes(&self) -> Entries {
        self.0.iter().filter(|e| !e.obsolete).cloned().collect()
    }

    /// Drops every fuzzy entry.
    pub fn clean_fuzzy(&self) -> Entries {
        self.0.iter().filter(|e| !e.is_fuzzy()).cloned().collect()
    }

    /// Index of the first entry with a matching context whose id is similar
    /// but not identical to `id` — near-miss detection for stale
    /// translations.
    pub fn fuzzy_find(&self, id: &str, context: &str) -> Option<usize> {
        self.0.iter().position(|e| {
            e.context == context && similarity::similar_but_not_identical(id, &e.id)
        })
    }

    /// Sorts by the first location, grouping by file and ordering by line.
    pub fn sort(&mut self) {
        self.0.sort_by(entry::compare);
    }

    pub fn is_sorted(&self) -> bool {
        is_sorted_with(&self.0, entry::compare)
    }

    pub fn sort_by_id(&mut self) {
        self.0.sort_by(entry::compare_by_id);
    }

    pub fn is_sorted_by_id(&self) -> bool {
        is_sorted_with(&self.0, entry::compare_by_id)
    }

    pub fn sort_by_file(&mut self) {
        self.0.sort_by(entry::compare_by_file);
    }

    pub fn is_sorted_by_file(&self) -> bool {
        is_sorted_with(&self.0, entry::compare_by_file)
    }

    pub fn sort_by_line(&mut self) {
        self.0.sort_by(entry::compare_by_line);
    }

    pub fn is_sorted_by_line(&self) -> bool {
        is_sorted_with(&self.0, entry::compare_by_line)
    }

    pub fn sort_by_fuzzy(&mut self) {
        self.0.sort_by(entry::compare_by_fuzzy);
    }

    pub fn is_sorted_by_fuzzy(&self) -> bool {
        is_sorted_with(&self.0, entry::compare_by_fuzzy)
    }

    pub fn sort_by_obsolete(&mut self) {
        self.0.sort_by(entry::compare_by_obsolete);
    }

    pub fn is_sorted_by_obsolete(&self) -> bool {
        is_sorted_with(&self.0, entry::compare_by_obsolete)
    }
}

fn is_sorted_with(entries: &[Entry], cmp: fn(&Entry, &Entry) -> Ordering) -> bool {
    entries
        .windows(2)
        .all(|pair| cmp(&pair[0], &pair[1]) != Ordering::Greater)
}
