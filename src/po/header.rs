//! Header metadata: the `Key: Value` lines stored in the empty-id entry.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::po::entry::Entry;

/// Plural form count assumed when the header declares none.
pub const DEFAULT_NPLURALS: u32 = 2;

static NPLURALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"nplurals\s*=\s*([0-9]+)").expect("nplurals pattern"));

/// A parsed view over a header entry's text.
///
/// The pipeline stores the header verbatim; this type interprets it on
/// demand. Lines that don't look like `Key: Value` are ignored rather than
/// rejected — a malformed header is still a usable catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<(String, String)>,
}

impl Header {
    pub fn parse(text: &str) -> Header {
        let fields = text
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();
        Header { fields }
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Plural count from the `Plural-Forms` field, or [DEFAULT_NPLURALS].
    pub fn nplurals(&self) -> u32 {
        self.get("Plural-Forms")
            .and_then(|forms| NPLURALS.captures(forms))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(DEFAULT_NPLURALS)
    }
}

/// Metadata used to generate a header entry.
///
/// The creation date is caller-supplied rather than read from a clock, so
/// that compiling a catalog stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub project_id_version: String,
    pub report_msgid_bugs_to: String,
    pub pot_creation_date: String,
    pub po_revision_date: String,
    pub last_translator: String,
    pub language_team: String,
    pub language: String,
    pub nplurals: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            project_id_version: "PACKAGE VERSION".to_string(),
            report_msgid_bugs_to: String::new(),
            pot_creation_date: String::new(),
            po_revision_date: String::new(),
            last_translator: String::new(),
            language_team: String::new(),
            language: String::new(),
            nplurals: DEFAULT_NPLURALS,
        }
    }
}

impl HeaderConfig {
    /// Renders the header entry, fields in the conventional order.
    pub fn to_entry(&self) -> Entry {
        let text = format!(
            concat!(
                "Project-Id-Version: {}\n",
                "Report-Msgid-Bugs-To: {}\n",
                "POT-Creation-Date: {}\n",
                "PO-Revision-Date: {}\n",
                "Last-Translator: {}\n",
                "Language-Team: {}\n",
                "Language: {}\n",
                "MIME-Version: 1.0\n",
                "Content-Type: text/plain; charset=UTF-8\n",
                "Content-Transfer-Encoding: 8bit\n",
                "Plural-Forms: nplurals={}; plural=(n != 1);\n",
            ),
            self.project_id_version,
            self.report_msgid_bugs_to,
            self.pot_creation_date,
            self.po_revision_date,
            self.last_translator,
            self.language_team,
            self.language,
            self.nplurals,
        );
        Entry {
            str: text,
            ..Default::default()
        }
    }
}
