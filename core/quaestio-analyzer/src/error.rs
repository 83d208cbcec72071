use thiserror::Error;

/// Failures that abort the analysis of a whole call.
///
/// Never returned to callers of [`crate::Analyzer::analyze`]; they are logged
/// and replaced by a single fallback result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("pattern match is missing variable `{0}`")]
    MissingBinding(&'static str),
    #[error("analysis panicked: {0}")]
    Panicked(String),
}
