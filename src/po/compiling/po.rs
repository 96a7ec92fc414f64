//! Textual catalog serialization.
//!
//! Entry layout is fixed: extracted comments, translator comments,
//! reference locations, flags, previous-id, then the message lines. The
//! header entry is emitted first with its metadata as one continuation line
//! per `Key: Value\n` pair, the conventional multi-line style. Obsolete
//! entries keep their message lines behind the `#~ ` prefix.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::debug;

use crate::po::entry::Entry;
use crate::po::file::File;
use crate::po::header::HeaderConfig;

/// How reference comments are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocationMode {
    /// `#: file:line`
    #[default]
    Full,
    /// `#: file`, one line per distinct file
    FileOnly,
    /// No reference comments at all.
    Never,
}

/// Textual compiler settings. The default emits everything.
#[derive(Debug, Clone, Default)]
pub struct PoConfig {
    /// Suppress the header entry.
    pub omit_header: bool,
    /// Create the output file if missing; otherwise `to_file` requires it
    /// to exist.
    pub force_po: bool,
    pub add_location: LocationMode,
    /// Decoration prepended/appended to every translation text; useful for
    /// pseudo-localization builds.
    pub msgstr_prefix: String,
    pub msgstr_suffix: String,
    /// Comment line emitted at the very top of the catalog.
    pub title: String,
    /// Metadata used when the file itself carries no header entry.
    pub header: HeaderConfig,
}

/// Serializes a [File] into the textual catalog format.
#[derive(Debug, Clone)]
pub struct PoCompiler {
    pub file: File,
    pub config: PoConfig,
}

impl PoCompiler {
    pub fn new(file: File) -> PoCompiler {
        PoCompiler {
            file,
            config: PoConfig::default(),
        }
    }

    pub fn with_config(file: File, config: PoConfig) -> PoCompiler {
        PoCompiler { file, config }
    }

    pub fn to_writer(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }

    /// Writes the catalog to `path`. With `force_po` the file is created or
    /// truncated; without it, the file must already exist.
    pub fn to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        debug!("writing catalog to {}", path.display());
        let mut file = if self.config.force_po {
            fs::File::create(path)?
        } else {
            fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(path)?
        };
        file.write_all(self.render().as_bytes())
    }

    fn render(&self) -> String {
        let entries = self.file.entries.clean_duplicates();
        debug!("rendering {} entries", entries.len());

        let mut blocks: Vec<String> = Vec::new();

        if !self.config.title.is_empty() {
            blocks.push(format!("# {}\n", self.config.title));
        }

        if !self.config.omit_header {
            let header = entries
                .iter()
                .find(|e| e.id.is_empty())
                .cloned()
                .unwrap_or_else(|| self.config.header.to_entry());
            blocks.push(self.format_entry(&header));
        }

        for entry in entries.iter().filter(|e| !e.id.is_empty()) {
            blocks.push(self.format_entry(entry));
        }

        blocks.join("\n")
    }

    fn format_entry(&self, entry: &Entry) -> String {
        let mut out = String::new();

        for comment in &entry.extracted_comments {
            out.push_str(&comment_line("#.", comment));
        }
        for comment in &entry.comments {
            out.push_str(&comment_line("#", comment));
        }
        match self.config.add_location {
            LocationMode::Full => {
                for location in &entry.locations {
                    if location.line > 0 {
                        out.push_str(&format!("#: {}:{}\n", location.file, location.line));
                    } else {
                        out.push_str(&format!("#: {}\n", location.file));
                    }
                }
            }
            LocationMode::FileOnly => {
                let mut seen: Vec<&str> = Vec::new();
                for location in &entry.locations {
                    if !seen.contains(&location.file.as_str()) {
                        seen.push(&location.file);
                        out.push_str(&format!("#: {}\n", location.file));
                    }
                }
            }
            LocationMode::Never => {}
        }
        if !entry.flags.is_empty() {
            out.push_str(&format!("#, {}\n", entry.flags.join(", ")));
        }
        for previous in &entry.previous {
            out.push_str(&comment_line("#|", previous));
        }

        let prefix = if entry.obsolete { "#~ " } else { "" };

        if !entry.context.is_empty() {
            out.push_str(&format!("{}msgctxt {}\n", prefix, quote(&entry.context)));
        }
        out.push_str(&format!("{}msgid {}\n", prefix, quote(&entry.id)));

        if entry.id.is_empty() {
            // Header: empty msgstr, one continuation line per metadata line.
            out.push_str(&format!("{}msgstr \"\"\n", prefix));
            for line in entry.str.split_inclusive('\n') {
                out.push_str(&format!("{}{}\n", prefix, quote(line)));
            }
        } else if !entry.plural.is_empty() {
            out.push_str(&format!("{}msgid_plural {}\n", prefix, quote(&entry.plural)));
            for plural in entry.sorted_plurals() {
                out.push_str(&format!(
                    "{}msgstr[{}] {}\n",
                    prefix,
                    plural.index,
                    quote(&self.decorate(&plural.text)),
                ));
            }
        } else {
            out.push_str(&format!(
                "{}msgstr {}\n",
                prefix,
                quote(&self.decorate(&entry.str)),
            ));
        }

        out
    }

    fn decorate(&self, text: &str) -> String {
        format!(
            "{}{}{}",
            self.config.msgstr_prefix, text, self.config.msgstr_suffix
        )
    }
}

impl fmt::Display for PoCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn comment_line(marker: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{}\n", marker)
    } else {
        format!("{} {}\n", marker, text)
    }
}

/// Quotes a string for the textual format, escaping `"`, `\`, newlines,
/// and tabs.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
