//! Generation: logical records to the domain model.
//!
//! This stage is total — every record lowers to exactly one entry, whatever
//! its content. Anything that could fail was already reported by the
//! normalizer, and the facade only invokes generation when no hard error
//! was collected.

use super::normalizing::Record;
use crate::po::entries::Entries;
use crate::po::entry::{Entry, PluralEntry};
use crate::po::file::File;

/// Lowers records into a [File], one entry per record, plural translations
/// sorted ascending by index regardless of source order.
pub fn generate(name: &str, records: Vec<Record>) -> File {
    let entries: Entries = records.into_iter().map(entry_from_record).collect();
    File {
        name: name.to_string(),
        entries,
    }
}

fn entry_from_record(record: Record) -> Entry {
    let mut plurals: Vec<PluralEntry> = record
        .plurals
        .into_iter()
        .map(|(index, text)| PluralEntry { index, text })
        .collect();
    plurals.sort_by_key(|p| p.index);

    Entry {
        id: record.id,
        context: record.context,
        plural: record.plural,
        plurals,
        str: record.str,
        locations: record.references,
        flags: record.flags,
        comments: record.comments,
        extracted_comments: record.extracted_comments,
        previous: record.previous,
        obsolete: false,
    }
}
