//! Compilation: the domain model back to catalog bytes, in both formats.
//!
//! [po] renders the textual format; [mo] produces the binary layout. Both
//! deduplicate on a derived copy right before emission — the caller's model
//! is never mutated — and both leave the choice of output sink (writer,
//! file, bytes) to the caller.

pub mod mo;
pub mod po;

pub use mo::{MoCompiler, MoConfig};
pub use po::{LocationMode, PoCompiler, PoConfig};
