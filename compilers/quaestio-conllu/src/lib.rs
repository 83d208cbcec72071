//! Reader for the tab-separated dependency annotation format (CoNLL-U).
//!
//! Text goes in, one [`DependencyGraph`] per sentence comes out. A malformed
//! sentence yields an error for that sentence only; reading continues with the
//! next one.

pub mod error;
pub mod fields;
pub mod reader;

pub use error::ParseError;
pub use reader::{parse_sentences, SentenceReader};

pub use quaestio_semgraph::DependencyGraph;
