//! A named catalog: one header entry plus the translation entries.

use serde::{Deserialize, Serialize};

use crate::po::entries::Entries;
use crate::po::entry::Entry;
use crate::po::header::Header;

/// A catalog file: entries in insertion order, with the header as the
/// distinguished first entry (`id == ""`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub entries: Entries,
}

impl File {
    /// Builds a file, merging duplicate entries on the way in.
    pub fn new(name: impl Into<String>, entries: Entries) -> File {
        File {
            name: name.into(),
            entries: entries.clean_duplicates(),
        }
    }

    /// Parsed view of the header entry's metadata. Empty when the catalog
    /// carries no header.
    pub fn header(&self) -> Header {
        self.entries
            .iter()
            .find(|e| e.is_header())
            .map(|e| Header::parse(&e.str))
            .unwrap_or_default()
    }

    /// Plural form count declared by the header, defaulting when absent.
    pub fn nplurals(&self) -> u32 {
        self.header().nplurals()
    }

    /// Upserts an entry under `(id, context)`: replaces the existing entry
    /// with that identity, or appends.
    pub fn set(&mut self, id: &str, context: &str, entry: Entry) {
        match self.entries.index_by_id_and_context(id, context) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Translation text for `(id, context)`, or `""` when absent.
    pub fn load_id(&self, id: &str, context: &str) -> &str {
        self.entries
            .index_by_id_and_context(id, context)
            .map(|i| self.entries[i].str.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, str_: &str) -> Entry {
        Entry {
            id: id.to_string(),
            str: str_.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_cleans_duplicates() {
        let file = File::new(
            "test.po",
            Entries(vec![entry("Hi", "Hola"), entry("Hi", "Hola")]),
        );
        assert_eq!(file.entries.len(), 1);
    }

    #[test]
    fn test_set_replaces_by_identity() {
        let mut file = File::new("test.po", Entries(vec![entry("Hi", "Hola")]));
        file.set("Hi", "", entry("Hi", "Buenas"));
        assert_eq!(file.entries.len(), 1);
        assert_eq!(file.load_id("Hi", ""), "Buenas");
    }

    #[test]
    fn test_set_appends_unknown_identity() {
        let mut file = File::new("test.po", Entries::new());
        file.set("Hi", "casual", entry("Hi", "Hola"));
        assert_eq!(file.entries.len(), 1);
        assert_eq!(file.load_id("Hi", "casual"), "Hola");
        assert_eq!(file.load_id("Hi", ""), "");
    }

    #[test]
    fn test_nplurals_comes_from_header() {
        let header = Entry {
            str: "Plural-Forms: nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : 2);\n"
                .to_string(),
            ..Default::default()
        };
        let file = File::new("test.po", Entries(vec![header]));
        assert_eq!(file.nplurals(), 3);

        let headerless = File::new("empty.po", Entries::new());
        assert_eq!(headerless.nplurals(), 2);
    }
}
