//! Catalog model and pipeline for the gettext PO/MO formats.
//!
//! Structure:
//!     The textual format flows through a fixed pipeline, each stage owning
//!     its input and returning an owned result plus its diagnostics:
//!
//!     source bytes
//!         -> [parsing::lexing]      flat token stream (logos)
//!         -> [parsing::syntax]      node list, local error recovery
//!         -> [parsing::normalizing] logical records, comment payloads parsed
//!         -> [parsing::generating]  domain [File]
//!
//!     The binary format is decoded in one step by [parsing::mo] and encoded
//!     by [compiling::mo]; [compiling::po] is the textual serializer. The
//!     [merging] module reconciles a reference catalog against newly
//!     extracted entries, and [extract] is the boundary through which a
//!     source-code scanner feeds discovered strings into the model.
//!
//! Diagnostics
//!
//!     Nothing in the pipeline panics on malformed input. Textual parsing
//!     collects every lexical, syntactic, and structural defect in a single
//!     pass and only generates the domain model when no hard error was seen;
//!     binary decoding fails fast because a broken offset table has no
//!     meaningful partial result. Progress and warnings are also reported
//!     through the `log` facade so a host application can surface them
//!     without threading a logger through every call.

pub mod compiling;
pub mod entries;
pub mod entry;
pub mod extract;
pub mod file;
pub mod header;
pub mod merging;
pub mod parsing;
pub mod similarity;

pub use compiling::{LocationMode, MoCompiler, MoConfig, PoCompiler, PoConfig};
pub use entries::Entries;
pub use entry::{Entry, Location, PluralEntry};
pub use extract::Discovery;
pub use file::File;
pub use header::{Header, HeaderConfig};
pub use merging::{MergeConfig, SortMode};
pub use parsing::{MoError, MoParser, ParseError, ParseOutcome, PoParser};
