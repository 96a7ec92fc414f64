//! The translation entry type and its comparison functions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Location of a translation string in the source code.
///
/// A line of 0 means the reference carried no line number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

/// One indexed plural translation (`msgstr[N]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralEntry {
    pub index: usize,
    pub text: String,
}

/// A translatable string, with its context, plural forms, comments, and
/// source code locations.
///
/// `context` and `plural` use the empty string for "absent", matching the
/// on-disk format where an absent `msgctxt`/`msgid_plural` is simply not
/// written. The fuzzy state is membership of the literal `"fuzzy"` flag in
/// `flags`, which keeps compiler output faithful to the representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub context: String,
    pub plural: String,
    pub plurals: Vec<PluralEntry>,
    pub str: String,
    pub locations: Vec<Location>,
    pub flags: Vec<String>,
    pub comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub previous: Vec<String>,
    pub obsolete: bool,
}

/// Separator used to embed a context into an identity key; the same byte the
/// binary format uses to join `msgctxt` and `msgid`.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

impl Entry {
    /// Identity key over `(id, context)`. Two entries with an equal unified
    /// id are the same translatable unit regardless of any other field.
    pub fn unified_id(&self) -> String {
        if self.context.is_empty() {
            self.id.clone()
        } else {
            format!("{}{}{}", self.context, CONTEXT_SEPARATOR, self.id)
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == "fuzzy")
    }

    pub fn is_plural(&self) -> bool {
        !self.plural.is_empty() || !self.plurals.is_empty()
    }

    /// The header is the distinguished entry with an empty id.
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context.is_empty()
    }

    /// Adds the `"fuzzy"` flag; idempotent.
    pub fn mark_fuzzy(&mut self) {
        if !self.is_fuzzy() {
            self.flags.push("fuzzy".to_string());
        }
    }

    /// Plural translations ordered by index, whatever the source order was.
    pub fn sorted_plurals(&self) -> Vec<PluralEntry> {
        let mut plurals = self.plurals.clone();
        plurals.sort_by_key(|p| p.index);
        plurals
    }

    fn first_location(&self) -> (&str, usize) {
        self.locations
            .first()
            .map(|l| (l.file.as_str(), l.line))
            .unwrap_or(("", 0))
    }
}

/// Compares by the first location, file then line; the composite order used
/// by the default sort.
pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    let (af, al) = a.first_location();
    let (bf, bl) = b.first_location();
    af.cmp(bf).then(al.cmp(&bl))
}

/// Compares by the file name of the first location only.
pub fn compare_by_file(a: &Entry, b: &Entry) -> Ordering {
    a.first_location().0.cmp(b.first_location().0)
}

/// Compares by id, lexicographically.
pub fn compare_by_id(a: &Entry, b: &Entry) -> Ordering {
    a.id.cmp(&b.id)
}

/// Compares by the line number of the first location only.
pub fn compare_by_line(a: &Entry, b: &Entry) -> Ordering {
    a.first_location().1.cmp(&b.first_location().1)
}

/// Non-fuzzy entries order before fuzzy ones.
pub fn compare_by_fuzzy(a: &Entry, b: &Entry) -> Ordering {
    a.is_fuzzy().cmp(&b.is_fuzzy())
}

/// Non-obsolete entries order before obsolete ones.
pub fn compare_by_obsolete(a: &Entry, b: &Entry) -> Ordering {
    a.obsolete.cmp(&b.obsolete)
}
