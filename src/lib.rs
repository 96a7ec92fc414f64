//! # po-tools
//!
//! A parser, merger, and compiler for gettext translation catalogs.
//!
//! The crate handles both catalog representations of the gettext ecosystem:
//! the human-editable textual format (PO) and its compiled binary counterpart
//! (MO). Parsing produces a domain model that can be merged against a fresh
//! extraction, deduplicated, sorted, and compiled back into either format.
//!
//! For the pipeline structure, see the [po] module documentation.

pub mod po;
