use quaestio_semgraph::GraphError;
use thiserror::Error;

/// Why a sentence was rejected. Line numbers are 1-based positions in the input text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected 10 tab-separated columns, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid token index `{value}`")]
    InvalidIndex { line: usize, value: String },
    #[error("line {line}: invalid head index `{value}`")]
    InvalidHead { line: usize, value: String },
    #[error("line {line}: invalid features `{value}`")]
    InvalidFeatures { line: usize, value: String },
    #[error("line {line}: invalid secondary edges `{value}`")]
    InvalidSecondaryEdge { line: usize, value: String },
    #[error("line {line}: token {index} appears twice")]
    DuplicateIndex { line: usize, index: u32 },
    #[error("line {line}: expected token {expected}, found {found}")]
    NonContiguousIndex { line: usize, expected: u32, found: u32 },
    #[error("line {line}: governor {governor} is not a token of the sentence")]
    DanglingHead { line: usize, governor: u32 },
    #[error("line {line}: sentence has no tokens")]
    EmptySentence { line: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ParseError {
    /// Input line the error was found on, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidIndex { line, .. }
            | Self::InvalidHead { line, .. }
            | Self::InvalidFeatures { line, .. }
            | Self::InvalidSecondaryEdge { line, .. }
            | Self::DuplicateIndex { line, .. }
            | Self::NonContiguousIndex { line, .. }
            | Self::DanglingHead { line, .. }
            | Self::EmptySentence { line } => Some(*line),
            Self::Graph(_) => None,
        }
    }
}
