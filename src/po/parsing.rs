//! Parsing: catalog bytes to the domain model, in both formats.
//!
//! Structure:
//!     The textual pipeline is split into one module per stage, each with a
//!     narrow contract:
//!
//!     [lexing]       source -> tokens with byte spans
//!     [syntax]       tokens -> nodes, bounded error accumulation
//!     [normalizing]  nodes -> logical records, typed comment payloads
//!     [generating]   records -> domain [File]
//!
//!     [PoParser] is the facade over those stages; one call runs them all
//!     and returns a [ParseOutcome] carrying the file (when no hard error
//!     was seen) together with every diagnostic collected along the way.
//!     [mo] decodes the binary format in a single step — binary decoding is
//!     fatal on the first structural violation, because an offset table
//!     that lies once cannot be trusted twice.

pub mod ast;
pub mod generating;
pub mod lexing;
pub mod mo;
pub mod normalizing;
pub mod syntax;
pub mod token;

use std::fmt;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, warn};

pub use mo::{MoError, MoParser};
pub use normalizing::{NormalizationError, NormalizationWarning};
pub use syntax::SyntaxError;
pub use token::Token;

use crate::po::file::File;

/// A hard error from textual parsing: either syntactic or structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Syntax(SyntaxError),
    Normalization(NormalizationError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(e) => e.fmt(f),
            ParseError::Normalization(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<SyntaxError> for ParseError {
    fn from(e: SyntaxError) -> Self {
        ParseError::Syntax(e)
    }
}

impl From<NormalizationError> for ParseError {
    fn from(e: NormalizationError) -> Self {
        ParseError::Normalization(e)
    }
}

/// Everything one parse produced: the file when no hard error was seen,
/// plus the full warning and error lists.
///
/// Returning diagnostics as a value forces every caller to observe them;
/// nothing is thrown, nothing is swallowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub file: Option<File>,
    pub warnings: Vec<NormalizationWarning>,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The file, or the first error. The full list stays available on the
    /// outcome for callers that want every defect.
    pub fn into_result(self) -> Result<File, ParseError> {
        match self.errors.into_iter().next() {
            None => Ok(self.file.expect("no errors implies a generated file")),
            Some(error) => Err(error),
        }
    }
}

/// Parser facade for the textual catalog format.
///
/// Construction only captures the source; all the work happens in
/// [PoParser::parse], which can be called any number of times.
#[derive(Debug, Clone)]
pub struct PoParser {
    source: String,
    name: String,
}

impl PoParser {
    pub fn from_str(source: &str, name: &str) -> PoParser {
        PoParser {
            source: source.to_string(),
            name: name.to_string(),
        }
    }

    /// Bytes are decoded as UTF-8, lossily: catalog files are declared
    /// UTF-8 by convention, and a stray invalid byte should surface as a
    /// replacement character in one entry, not kill the whole parse.
    pub fn from_bytes(bytes: &[u8], name: &str) -> PoParser {
        PoParser {
            source: String::from_utf8_lossy(bytes).into_owned(),
            name: name.to_string(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> io::Result<PoParser> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(PoParser::from_bytes(
            &bytes,
            &path.to_string_lossy(),
        ))
    }

    pub fn from_reader(mut reader: impl Read, name: &str) -> io::Result<PoParser> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(PoParser::from_bytes(&bytes, name))
    }

    /// Runs the full pipeline: lex, parse, normalize, and — only when no
    /// hard error was collected — generate the domain model.
    pub fn parse(&self) -> ParseOutcome {
        debug!("parsing {}", self.name);

        let (nodes, syntax_errors) = syntax::parse(&self.source, &self.name);
        let (records, warnings, normalization_errors) =
            normalizing::normalize(&nodes, &self.source, &self.name);

        for warning in &warnings {
            warn!("{}", warning);
        }

        let errors: Vec<ParseError> = syntax_errors
            .into_iter()
            .map(ParseError::from)
            .chain(normalization_errors.into_iter().map(ParseError::from))
            .collect();

        let file = if errors.is_empty() {
            Some(generating::generate(&self.name, records))
        } else {
            debug!("{}: {} errors, model not generated", self.name, errors.len());
            None
        };

        ParseOutcome {
            file,
            warnings,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_produces_a_file_on_clean_input() {
        let outcome = PoParser::from_str("msgid \"Hi\"\nmsgstr \"Hola\"", "test.po").parse();
        assert!(outcome.is_ok());
        let file = outcome.into_result().expect("clean parse");
        assert_eq!(file.name, "test.po");
        assert_eq!(file.entries.len(), 1);
        assert_eq!(file.entries[0].str, "Hola");
    }

    #[test]
    fn test_errors_suppress_the_model_but_not_each_other() {
        let input = "bogus\nmsgid \"x\"\nmsgstr \"y\"\nmsgstr \"z\"";
        let outcome = PoParser::from_str(input, "bad.po").parse();
        assert!(outcome.file.is_none());
        // One syntax error and one normalization error, from a single pass.
        assert_eq!(outcome.errors.len(), 2);
        assert!(matches!(outcome.errors[0], ParseError::Syntax(_)));
        assert!(matches!(outcome.errors[1], ParseError::Normalization(_)));
    }

    #[test]
    fn test_warnings_do_not_block_generation() {
        let input = "msgid \"apple\"\nmsgid_plural \"apples\"";
        let outcome = PoParser::from_str(input, "test.po").parse();
        assert!(outcome.is_ok());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.file.is_some());
    }

    #[test]
    fn test_from_reader() {
        let parser =
            PoParser::from_reader("msgid \"a\"\nmsgstr \"b\"".as_bytes(), "mem.po").expect("read");
        assert!(parser.parse().is_ok());
    }
}
