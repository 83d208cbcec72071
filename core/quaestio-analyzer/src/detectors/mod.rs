//! Independent checks run on every parsed sentence. Each one only appends to
//! the sentence's result and never reads what another check found.

pub mod lexical;
pub mod syntax;
