//! Normalization: node list to logical records.
//!
//! A record is the contiguous run of nodes belonging to one translatable
//! unit: the comments immediately preceding it, an optional `msgctxt`, the
//! `msgid` that anchors it, and the translation nodes up to the next
//! `msgid`/`msgctxt`. Comment sub-kinds are classified here, once, by their
//! first character, and their payloads parsed into typed fields.
//!
//! Structural violations (a stray `msgstr`, a duplicate plural index, a
//! malformed reference) are errors; recoverable omissions (a plural record
//! with no `msgstr[N]` yet) are warnings. Both are aggregated over the whole
//! node list — the caller sees every defect from a single pass and decides
//! whether warnings are fatal.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::Node;
use super::lexing::line_of;
use crate::po::entry::Location;

/// `file:line` reference token inside a `#:` comment.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+):([0-9]+)$").expect("reference pattern"));

/// Structural violations found while grouping nodes into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// A construct appeared where the grammar does not allow it: outside
    /// any record, or repeated within one.
    Unexpected {
        construct: &'static str,
        file: String,
        line: usize,
    },
    /// Two `msgstr[N]` nodes with the same index in one record.
    DuplicatePluralIndex {
        index: usize,
        file: String,
        line: usize,
    },
    /// A `#:` comment token with a colon but no numeric line.
    BadReference {
        reference: String,
        file: String,
        line: usize,
    },
    /// `msgstr[N]` in a record that has no `msgid_plural`.
    OrphanPluralTranslation { file: String, line: usize },
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationError::Unexpected {
                construct,
                file,
                line,
            } => {
                write!(f, "{}:{}: unexpected {}", file, line, construct)
            }
            NormalizationError::DuplicatePluralIndex { index, file, line } => {
                write!(f, "{}:{}: duplicate plural index {}", file, line, index)
            }
            NormalizationError::BadReference {
                reference,
                file,
                line,
            } => {
                write!(f, "{}:{}: malformed reference {:?}", file, line, reference)
            }
            NormalizationError::OrphanPluralTranslation { file, line } => {
                write!(f, "{}:{}: msgstr[N] without msgid_plural", file, line)
            }
        }
    }
}

impl std::error::Error for NormalizationError {}

/// Recoverable omissions; never block generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationWarning {
    /// A plural record with no `msgstr[N]` at all; compiles to an empty
    /// plural table.
    MissingPluralTranslations { id: String, file: String, line: usize },
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationWarning::MissingPluralTranslations { id, file, line } => {
                write!(
                    f,
                    "{}:{}: plural entry {:?} has no msgstr[N] translations",
                    file, line, id
                )
            }
        }
    }
}

/// A logical record: one translatable unit with its comment payloads
/// resolved.
///
/// The header record (`id == ""`) keeps its text verbatim; interpreting the
/// `Key: Value` sublines is the [crate::po::header] module's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub context: String,
    pub plural: String,
    pub str: String,
    pub plurals: Vec<(usize, String)>,
    pub comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub references: Vec<Location>,
    pub flags: Vec<String>,
    pub previous: Vec<String>,
    pub offset: usize,
}

/// A record being assembled, with the state needed to detect duplicates.
#[derive(Debug, Default)]
struct Open {
    record: Record,
    has_str: bool,
}

/// Groups nodes into records, classifying comments and validating plural
/// structure along the way.
pub fn normalize(
    nodes: &[Node],
    source: &str,
    name: &str,
) -> (Vec<Record>, Vec<NormalizationWarning>, Vec<NormalizationError>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let mut pending_comments: Vec<(String, usize)> = Vec::new();
    let mut pending_context: Option<String> = None;
    let mut open: Option<Open> = None;

    let at = |offset: usize| line_of(source, offset);

    for node in nodes {
        match node {
            Node::Comment { text, offset } => {
                pending_comments.push((text.clone(), *offset));
            }
            Node::Msgctxt { text, offset } => {
                if pending_context.is_some() {
                    errors.push(NormalizationError::Unexpected {
                        construct: "msgctxt",
                        file: name.to_string(),
                        line: at(*offset),
                    });
                    continue;
                }
                close(&mut open, &mut records, &mut warnings, &mut errors, name, source);
                pending_context = Some(text.clone());
            }
            Node::Msgid { text, offset } => {
                close(&mut open, &mut records, &mut warnings, &mut errors, name, source);
                let mut record = Record {
                    id: text.clone(),
                    context: pending_context.take().unwrap_or_default(),
                    offset: *offset,
                    ..Default::default()
                };
                for (comment, comment_offset) in pending_comments.drain(..) {
                    classify_comment(
                        &comment,
                        comment_offset,
                        &mut record,
                        &mut errors,
                        source,
                        name,
                    );
                }
                open = Some(Open {
                    record,
                    has_str: false,
                });
            }
            Node::Msgstr { text, offset } => match open.as_mut() {
                Some(o) if !o.has_str => {
                    o.record.str = text.clone();
                    o.has_str = true;
                }
                _ => errors.push(NormalizationError::Unexpected {
                    construct: "msgstr",
                    file: name.to_string(),
                    line: at(*offset),
                }),
            },
            Node::MsgidPlural { text, offset } => match open.as_mut() {
                Some(o) if o.record.plural.is_empty() => {
                    o.record.plural = text.clone();
                }
                _ => errors.push(NormalizationError::Unexpected {
                    construct: "msgid_plural",
                    file: name.to_string(),
                    line: at(*offset),
                }),
            },
            Node::MsgstrPlural {
                index,
                text,
                offset,
            } => match open.as_mut() {
                Some(o) => {
                    if o.record.plurals.iter().any(|(i, _)| i == index) {
                        errors.push(NormalizationError::DuplicatePluralIndex {
                            index: *index,
                            file: name.to_string(),
                            line: at(*offset),
                        });
                    } else {
                        o.record.plurals.push((*index, text.clone()));
                    }
                }
                None => errors.push(NormalizationError::Unexpected {
                    construct: "msgstr[N]",
                    file: name.to_string(),
                    line: at(*offset),
                }),
            },
        }
    }

    close(&mut open, &mut records, &mut warnings, &mut errors, name, source);

    if pending_context.is_some() {
        errors.push(NormalizationError::Unexpected {
            construct: "msgctxt without msgid",
            file: name.to_string(),
            line: at(source.len()),
        });
    }

    (records, warnings, errors)
}

/// Finalizes the record under assembly, checking plural coherence.
fn close(
    open: &mut Option<Open>,
    records: &mut Vec<Record>,
    warnings: &mut Vec<NormalizationWarning>,
    errors: &mut Vec<NormalizationError>,
    name: &str,
    source: &str,
) {
    let Some(open) = open.take() else {
        return;
    };
    let record = open.record;
    let line = line_of(source, record.offset);

    if !record.plurals.is_empty() && record.plural.is_empty() {
        errors.push(NormalizationError::OrphanPluralTranslation {
            file: name.to_string(),
            line,
        });
    }
    if !record.plural.is_empty() && record.plurals.is_empty() {
        warnings.push(NormalizationWarning::MissingPluralTranslations {
            id: record.id.clone(),
            file: name.to_string(),
            line,
        });
    }

    records.push(record);
}

/// Resolves a comment's sub-kind from its first character and parses the
/// payload into the record's typed fields.
fn classify_comment(
    text: &str,
    offset: usize,
    record: &mut Record,
    errors: &mut Vec<NormalizationError>,
    source: &str,
    name: &str,
) {
    match text.chars().next() {
        Some('.') => record.extracted_comments.push(text[1..].trim().to_string()),
        Some(':') => parse_references(&text[1..], offset, record, errors, source, name),
        Some(',') => record.flags.extend(
            text[1..]
                .split(',')
                .map(|flag| flag.trim().to_string())
                .filter(|flag| !flag.is_empty()),
        ),
        Some('|') => record.previous.push(text[1..].trim().to_string()),
        _ => record.comments.push(text.trim().to_string()),
    }
}

/// Parses the whitespace-separated `file:line` tokens of a `#:` comment.
/// A token without a colon is a file name with the line defaulted to 0.
fn parse_references(
    list: &str,
    offset: usize,
    record: &mut Record,
    errors: &mut Vec<NormalizationError>,
    source: &str,
    name: &str,
) {
    for token in list.split_whitespace() {
        if let Some(caps) = REFERENCE.captures(token) {
            match caps[2].parse() {
                Ok(line) => record.references.push(Location {
                    file: caps[1].to_string(),
                    line,
                }),
                Err(_) => errors.push(NormalizationError::BadReference {
                    reference: token.to_string(),
                    file: name.to_string(),
                    line: line_of(source, offset),
                }),
            }
        } else if token.contains(':') {
            errors.push(NormalizationError::BadReference {
                reference: token.to_string(),
                file: name.to_string(),
                line: line_of(source, offset),
            });
        } else {
            record.references.push(Location {
                file: token.to_string(),
                line: 0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::po::parsing::syntax;

    fn run(input: &str) -> (Vec<Record>, Vec<NormalizationWarning>, Vec<NormalizationError>) {
        let (nodes, errors) = syntax::parse(input, "test.po");
        assert!(errors.is_empty(), "fixture has syntax errors: {:?}", errors);
        normalize(&nodes, input, "test.po")
    }

    #[test]
    fn test_groups_records_at_msgid_boundaries() {
        let input = "msgid \"a\"\nmsgstr \"A\"\n\nmsgid \"b\"\nmsgstr \"B\"";
        let (records, warnings, errors) = run(input);
        assert!(warnings.is_empty() && errors.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].str, "A");
        assert_eq!(records[1].id, "b");
    }

    #[test]
    fn test_context_attaches_to_following_msgid() {
        let input = "msgctxt \"formal\"\nmsgid \"Hello\"\nmsgstr \"Saludos\"";
        let (records, _, errors) = run(input);
        assert!(errors.is_empty());
        assert_eq!(records[0].context, "formal");
    }

    #[test]
    fn test_comment_sub_kinds_are_classified_once() {
        let input = "# plain words\n\
                     #. from the extractor\n\
                     #: main.go:12 util.go:3 nameonly\n\
                     #, fuzzy, c-format\n\
                     #| old id\n\
                     msgid \"x\"\n\
                     msgstr \"y\"";
        let (records, _, errors) = run(input);
        assert!(errors.is_empty());
        let record = &records[0];
        assert_eq!(record.comments, vec!["plain words".to_string()]);
        assert_eq!(
            record.extracted_comments,
            vec!["from the extractor".to_string()]
        );
        assert_eq!(
            record.references,
            vec![
                Location {
                    file: "main.go".to_string(),
                    line: 12
                },
                Location {
                    file: "util.go".to_string(),
                    line: 3
                },
                Location {
                    file: "nameonly".to_string(),
                    line: 0
                },
            ]
        );
        assert_eq!(
            record.flags,
            vec!["fuzzy".to_string(), "c-format".to_string()]
        );
        assert_eq!(record.previous, vec!["old id".to_string()]);
    }

    #[test]
    fn test_malformed_reference_is_an_error() {
        let input = "#: file:notaline\nmsgid \"x\"\nmsgstr \"y\"";
        let (_, _, errors) = run(input);
        assert_eq!(
            errors,
            vec![NormalizationError::BadReference {
                reference: "file:notaline".to_string(),
                file: "test.po".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_plural_record_without_translations_warns() {
        let input = "msgid \"apple\"\nmsgid_plural \"apples\"";
        let (records, warnings, errors) = run(input);
        assert!(errors.is_empty());
        assert_eq!(records[0].plural, "apples");
        assert_eq!(
            warnings,
            vec![NormalizationWarning::MissingPluralTranslations {
                id: "apple".to_string(),
                file: "test.po".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_stray_plural_translation_is_an_error() {
        let input = "msgid \"x\"\nmsgstr[0] \"y\"";
        let (_, _, errors) = run(input);
        assert_eq!(
            errors,
            vec![NormalizationError::OrphanPluralTranslation {
                file: "test.po".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_duplicate_plural_index_is_an_error() {
        let input = "msgid \"x\"\nmsgid_plural \"xs\"\nmsgstr[0] \"a\"\nmsgstr[0] \"b\"";
        let (records, _, errors) = run(input);
        assert_eq!(
            errors,
            vec![NormalizationError::DuplicatePluralIndex {
                index: 0,
                file: "test.po".to_string(),
                line: 4,
            }]
        );
        // The first occurrence is kept.
        assert_eq!(records[0].plurals, vec![(0, "a".to_string())]);
    }

    #[test]
    fn test_msgstr_outside_any_record_is_an_error() {
        let input = "msgstr \"orphan\"";
        let (records, _, errors) = run(input);
        assert!(records.is_empty());
        assert_eq!(
            errors,
            vec![NormalizationError::Unexpected {
                construct: "msgstr",
                file: "test.po".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_duplicate_msgstr_is_an_error() {
        let input = "msgid \"x\"\nmsgstr \"a\"\nmsgstr \"b\"";
        let (records, _, errors) = run(input);
        assert_eq!(records[0].str, "a");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_header_record_text_is_kept_verbatim() {
        let input = "msgid \"\"\nmsgstr \"\"\n\"Language: en\\n\"\n\"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"";
        let (records, _, errors) = run(input);
        assert!(errors.is_empty());
        assert_eq!(records[0].id, "");
        assert_eq!(
            records[0].str,
            "Language: en\nPlural-Forms: nplurals=2; plural=(n != 1);\n"
        );
    }
}
