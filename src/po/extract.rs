//! The source-extraction boundary.
//!
//! Scanning a host language's syntax tree for translatable call sites lives
//! outside this crate; what a scanner produces is an ordered sequence of
//! discoveries — id, optional context, optional plural, and where in the
//! source it was seen. This module turns that sequence into the domain
//! model, merging repeated discoveries of the same string into one entry
//! with accumulated locations.

use crate::po::entries::Entries;
use crate::po::entry::{Entry, Location};
use crate::po::file::File;
use crate::po::header::HeaderConfig;

/// One translatable call site reported by a scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub id: String,
    pub context: Option<String>,
    pub plural: Option<String>,
    pub file: String,
    pub line: usize,
}

impl Discovery {
    pub fn into_entry(self) -> Entry {
        Entry {
            id: self.id,
            context: self.context.unwrap_or_default(),
            plural: self.plural.unwrap_or_default(),
            locations: vec![Location {
                file: self.file,
                line: self.line,
            }],
            ..Default::default()
        }
    }
}

/// Builds entries from discoveries, deduplicated with first-seen order and
/// merged locations.
pub fn entries_from_discoveries(discoveries: impl IntoIterator<Item = Discovery>) -> Entries {
    discoveries
        .into_iter()
        .map(Discovery::into_entry)
        .collect::<Entries>()
        .clean_duplicates()
}

/// Builds a complete catalog from discoveries: a generated header entry
/// followed by the deduplicated entries.
pub fn file_from_discoveries(
    name: &str,
    header: &HeaderConfig,
    discoveries: impl IntoIterator<Item = Discovery>,
) -> File {
    let mut entries = Entries(vec![header.to_entry()]);
    entries.extend(entries_from_discoveries(discoveries));
    File {
        name: name.to_string(),
        entries,
    }
}
