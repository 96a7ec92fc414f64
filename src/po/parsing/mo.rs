//! Binary catalog decoding.
//!
//! The compiled format is a fixed header, two tables of (length, offset)
//! descriptors — original strings and translations — and a string pool.
//! All offsets are relative to the start of the file. A context is embedded
//! in the original string as `context EOT id`; a plural pair travels as
//! `id NUL plural` with the translations NUL-joined. Decoding inverts all
//! of that.
//!
//! Unlike textual parsing, decoding here is fatal on the first violation:
//! once the magic, revision, or an offset is wrong, every later read would
//! be meaningless, so there is no partial result to return.

use std::fmt;
use std::io::{self, Read};
use std::path::Path;

use log::debug;

use crate::po::entries::Entries;
use crate::po::entry::{Entry, PluralEntry, CONTEXT_SEPARATOR};
use crate::po::file::File;

/// Magic number of the binary catalog format, as written by a little-endian
/// producer.
pub const MAGIC: u32 = 0x950412de;
/// The same magic as read from a big-endian producer's output.
pub const MAGIC_SWAPPED: u32 = 0xde120495;

/// Highest supported major revision.
const MAX_MAJOR_REVISION: u32 = 1;

/// Fatal binary-format violations.
#[derive(Debug)]
pub enum MoError {
    Io(io::Error),
    /// The first four bytes are not the format magic in either byte order.
    BadMagic(u32),
    /// Major revision newer than this implementation understands.
    UnsupportedRevision(u32),
    /// A read past the end of the data.
    Truncated { offset: usize },
    /// A descriptor pointing outside the file.
    OffsetOutOfRange { index: usize },
    /// A string that is not valid UTF-8.
    InvalidString { index: usize },
}

impl fmt::Display for MoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoError::Io(e) => write!(f, "io error: {}", e),
            MoError::BadMagic(magic) => write!(f, "bad magic number {:#010x}", magic),
            MoError::UnsupportedRevision(revision) => {
                write!(f, "unsupported format revision {:#010x}", revision)
            }
            MoError::Truncated { offset } => {
                write!(f, "file truncated: read past end at offset {}", offset)
            }
            MoError::OffsetOutOfRange { index } => {
                write!(f, "string {} has an out-of-range offset", index)
            }
            MoError::InvalidString { index } => {
                write!(f, "string {} is not valid UTF-8", index)
            }
        }
    }
}

impl std::error::Error for MoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MoError {
    fn from(e: io::Error) -> Self {
        MoError::Io(e)
    }
}

/// Parser facade for the binary catalog format.
#[derive(Debug, Clone)]
pub struct MoParser {
    data: Vec<u8>,
    name: String,
}

impl MoParser {
    pub fn from_bytes(data: impl Into<Vec<u8>>, name: &str) -> MoParser {
        MoParser {
            data: data.into(),
            name: name.to_string(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<MoParser, MoError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(MoParser::from_bytes(data, &path.to_string_lossy()))
    }

    pub fn from_reader(mut reader: impl Read, name: &str) -> Result<MoParser, MoError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(MoParser::from_bytes(data, name))
    }

    /// Decodes the whole catalog, or fails with the first violation.
    pub fn parse(&self) -> Result<File, MoError> {
        debug!("decoding {}", self.name);
        decode(&self.data, &self.name)
    }
}

/// Byte-order-aware reads over the raw data.
struct Reader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl Reader<'_> {
    fn u32_at(&self, offset: usize) -> Result<u32, MoError> {
        let bytes = self
            .data
            .get(offset..offset + 4)
            .ok_or(MoError::Truncated { offset })?;
        let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn str_at(&self, offset: usize, len: usize, index: usize) -> Result<&str, MoError> {
        let bytes = self
            .data
            .get(offset..offset + len)
            .ok_or(MoError::OffsetOutOfRange { index })?;
        std::str::from_utf8(bytes).map_err(|_| MoError::InvalidString { index })
    }
}

fn decode(data: &[u8], name: &str) -> Result<File, MoError> {
    let mut reader = Reader {
        data,
        big_endian: false,
    };

    let magic = reader.u32_at(0)?;
    match magic {
        MAGIC => {}
        MAGIC_SWAPPED => reader.big_endian = true,
        other => return Err(MoError::BadMagic(other)),
    }

    let revision = reader.u32_at(4)?;
    if revision >> 16 > MAX_MAJOR_REVISION {
        return Err(MoError::UnsupportedRevision(revision));
    }

    let count = reader.u32_at(8)? as usize;
    let originals_offset = reader.u32_at(12)? as usize;
    let translations_offset = reader.u32_at(16)? as usize;
    // Offsets 20/24 hold the hash table size and offset; the hash table is
    // a lookup accelerator and carries no information of its own.

    let mut entries = Entries::new();
    for index in 0..count {
        let original = read_table_string(&reader, originals_offset, index)?;
        let translation = read_table_string(&reader, translations_offset, index)?;
        entries.push(entry_from_pair(original, translation));
    }

    Ok(File {
        name: name.to_string(),
        entries,
    })
}

fn read_table_string<'a>(
    reader: &'a Reader<'a>,
    table_offset: usize,
    index: usize,
) -> Result<&'a str, MoError> {
    let descriptor = table_offset + index * 8;
    let len = reader.u32_at(descriptor)? as usize;
    let offset = reader.u32_at(descriptor + 4)? as usize;
    reader.str_at(offset, len, index)
}

/// Splits one (original, translation) pair back into a domain entry,
/// undoing the context and plural embedding.
fn entry_from_pair(original: &str, translation: &str) -> Entry {
    let (context, rest) = match original.split_once(CONTEXT_SEPARATOR) {
        Some((context, rest)) => (context, rest),
        None => ("", original),
    };
    let (id, plural) = match rest.split_once('\0') {
        Some((id, plural)) => (id, plural),
        None => (rest, ""),
    };

    let mut entry = Entry {
        id: id.to_string(),
        context: context.to_string(),
        plural: plural.to_string(),
        ..Default::default()
    };

    if plural.is_empty() {
        entry.str = translation.to_string();
    } else {
        entry.plurals = translation
            .split('\0')
            .enumerate()
            .map(|(index, text)| PluralEntry {
                index,
                text: text.to_string(),
            })
            .collect();
    }

    entry
}
