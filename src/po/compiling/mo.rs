//! Binary catalog serialization.
//!
//! The writer is two-pass: every size and offset is computed before a
//! single byte is emitted, which keeps the format invariant — all offsets
//! relative to the file start — visible in one place instead of smeared
//! across incremental position bookkeeping.
//!
//! Entry order is preserved as-is after deduplication. The hash table is
//! omitted (size 0); readers fall back to scanning, and the tables remain
//! valid for any consumer that walks the descriptors.

use std::io::{self, Write};
use std::path::Path;

use log::debug;

use crate::po::entry::{Entry, CONTEXT_SEPARATOR};
use crate::po::file::File;
use crate::po::parsing::mo::MAGIC;

/// Size of the fixed header: seven 32-bit fields.
const HEADER_SIZE: u32 = 28;

/// Binary compiler settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoConfig {
    /// Leave fuzzy entries out of the output, the way installers usually
    /// want their runtime catalogs.
    pub skip_fuzzy: bool,
}

/// Serializes a [File] into the binary catalog format.
#[derive(Debug, Clone)]
pub struct MoCompiler {
    pub file: File,
    pub config: MoConfig,
}

impl MoCompiler {
    pub fn new(file: File) -> MoCompiler {
        MoCompiler {
            file,
            config: MoConfig::default(),
        }
    }

    pub fn with_config(file: File, config: MoConfig) -> MoCompiler {
        MoCompiler { file, config }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let entries = self.file.entries.clean_duplicates();
        let pairs: Vec<(String, String)> = entries
            .iter()
            .filter(|e| !e.obsolete)
            .filter(|e| !(self.config.skip_fuzzy && e.is_fuzzy()))
            .map(encode_pair)
            .collect();
        debug!("encoding {} strings", pairs.len());

        // Pass one: lay the file out.
        let count = pairs.len() as u32;
        let originals_offset = HEADER_SIZE;
        let translations_offset = originals_offset + count * 8;
        let pool_offset = translations_offset + count * 8;

        let mut original_descriptors: Vec<(u32, u32)> = Vec::with_capacity(pairs.len());
        let mut translation_descriptors: Vec<(u32, u32)> = Vec::with_capacity(pairs.len());
        let mut pool: Vec<u8> = Vec::new();

        for (original, translation) in &pairs {
            original_descriptors.push((original.len() as u32, pool_offset + pool.len() as u32));
            pool.extend_from_slice(original.as_bytes());
            pool.push(0);

            translation_descriptors
                .push((translation.len() as u32, pool_offset + pool.len() as u32));
            pool.extend_from_slice(translation.as_bytes());
            pool.push(0);
        }

        // Pass two: emit.
        let mut out = Vec::with_capacity(pool_offset as usize + pool.len());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // format revision
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&originals_offset.to_le_bytes());
        out.extend_from_slice(&translations_offset.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // hash table size
        out.extend_from_slice(&0u32.to_le_bytes()); // hash table offset
        for (len, offset) in &original_descriptors {
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        for (len, offset) in &translation_descriptors {
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out.extend_from_slice(&pool);
        out
    }

    pub fn to_writer(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        debug!("writing binary catalog to {}", path.display());
        std::fs::File::create(path)?.write_all(&self.to_bytes())
    }
}

/// Encodes one entry as its (original, translation) string pair: context
/// joined with the EOT separator, plural id appended after a NUL, plural
/// translations NUL-joined in index order.
fn encode_pair(entry: &Entry) -> (String, String) {
    let mut original = String::new();
    if !entry.context.is_empty() {
        original.push_str(&entry.context);
        original.push(CONTEXT_SEPARATOR);
    }
    original.push_str(&entry.id);

    let translation = if entry.plural.is_empty() {
        entry.str.clone()
    } else {
        original.push('\0');
        original.push_str(&entry.plural);
        let forms: Vec<String> = entry
            .sorted_plurals()
            .into_iter()
            .map(|p| p.text)
            .collect();
        forms.join("\0")
    };

    (original, translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::po::entries::Entries;
    use crate::po::entry::PluralEntry;

    #[test]
    fn test_header_layout() {
        let file = File {
            name: "test.mo".to_string(),
            entries: Entries(vec![Entry {
                id: "Hi".to_string(),
                str: "Hola".to_string(),
                ..Default::default()
            }]),
        };
        let bytes = MoCompiler::new(file).to_bytes();

        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        assert_eq!(u32_at(0), MAGIC);
        assert_eq!(u32_at(4), 0, "revision");
        assert_eq!(u32_at(8), 1, "string count");
        assert_eq!(u32_at(12), 28, "originals table");
        assert_eq!(u32_at(16), 36, "translations table");
        assert_eq!(u32_at(20), 0, "hash table size");
        // Descriptor 0: "Hi" at the start of the pool.
        assert_eq!(u32_at(28), 2);
        assert_eq!(u32_at(32), 44);
        assert_eq!(&bytes[44..47], b"Hi\0");
    }

    #[test]
    fn test_plural_and_context_embedding() {
        let entry = Entry {
            id: "Apple".to_string(),
            context: "USA".to_string(),
            plural: "Apples".to_string(),
            plurals: vec![
                PluralEntry {
                    index: 0,
                    text: "Manzana".to_string(),
                },
                PluralEntry {
                    index: 1,
                    text: "Manzanas".to_string(),
                },
            ],
            ..Default::default()
        };
        let (original, translation) = encode_pair(&entry);
        assert_eq!(original, "USA\u{4}Apple\0Apples");
        assert_eq!(translation, "Manzana\0Manzanas");
    }

    #[test]
    fn test_obsolete_entries_are_left_out() {
        let file = File {
            name: "test.mo".to_string(),
            entries: Entries(vec![Entry {
                id: "old".to_string(),
                obsolete: true,
                ..Default::default()
            }]),
        };
        let bytes = MoCompiler::new(file).to_bytes();
        assert_eq!(
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            0
        );
    }

    #[test]
    fn test_skip_fuzzy_filters_flagged_entries() {
        let mut fuzzy = Entry {
            id: "maybe".to_string(),
            ..Default::default()
        };
        fuzzy.mark_fuzzy();
        let file = File {
            name: "test.mo".to_string(),
            entries: Entries(vec![fuzzy]),
        };

        let kept = MoCompiler::new(file.clone()).to_bytes();
        assert_eq!(u32::from_le_bytes([kept[8], kept[9], kept[10], kept[11]]), 1);

        let skipped = MoCompiler::with_config(file, MoConfig { skip_fuzzy: true }).to_bytes();
        assert_eq!(
            u32::from_le_bytes([skipped[8], skipped[9], skipped[10], skipped[11]]),
            0
        );
    }
}
