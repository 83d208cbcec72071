//! Question detection over dependency-annotated German text.
//!
//! An [`Analyzer`] hands the input to an [`AnnotationProvider`], parses the
//! returned annotation into one graph per sentence, and runs two detectors on
//! each: a lexicon scan for question words and a verb-before-subject check.

pub mod detectors;
pub mod error;
pub mod lexicon;
pub mod provider;
pub mod result;

#[cfg(test)]
mod fixtures;

pub use error::AnalysisError;
pub use provider::{AnnotationProvider, CachedProvider, StaticAnnotation};
pub use quaestio_semgraph::DependencyGraph;
pub use result::{AnalysisReport, QuestionPhrase, SentenceAnalysis};

use quaestio_conllu::parse_sentences;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Let secondary (enhanced) edges satisfy the subject relation.
    pub secondary_edges: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { secondary_edges: true }
    }
}

pub struct Analyzer<P> {
    provider: P,
    options: AnalyzerOptions,
}

impl<P: AnnotationProvider> Analyzer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, AnalyzerOptions::default())
    }

    pub fn with_options(provider: P, options: AnalyzerOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One result per annotated sentence, in input order.
    ///
    /// Never fails. Blank input or a blank annotation gives no results.
    /// Sentences whose annotation is malformed are left out. Any other failure,
    /// including a panic in the provider, discards everything and returns a
    /// single result carrying `text` unchanged and no graph.
    pub fn analyze(&self, text: &str) -> Vec<SentenceAnalysis> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let normalized = normalize_whitespace(text);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(&normalized)))
            .unwrap_or_else(|payload| Err(AnalysisError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(results) => {
                debug!(sentences = results.len(), "analysis finished");
                results
            }
            Err(err) => {
                error!(error = %err, "analysis failed, returning input as fallback");
                vec![SentenceAnalysis::fallback(text)]
            }
        }
    }

    fn run(&self, text: &str) -> Result<Vec<SentenceAnalysis>, AnalysisError> {
        let annotation = self.provider.annotate(text);
        if annotation.trim().is_empty() {
            debug!("empty annotation");
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for sentence in parse_sentences(&annotation) {
            let graph = match sentence {
                Ok(graph) => graph,
                Err(err) => {
                    warn!(error = %err, "skipping malformed sentence");
                    continue;
                }
            };

            let mut analysis = SentenceAnalysis::new(graph);
            detectors::lexical::detect(&mut analysis);
            detectors::syntax::detect(&mut analysis, &self.options)?;
            debug!(
                sent_id = ?analysis.graph().and_then(|g| g.sent_id()),
                words = analysis.question_words().len(),
                phrases = analysis.question_phrases().len(),
                "sentence analyzed"
            );
            results.push(analysis);
        }
        Ok(results)
    }
}

/// Trims and collapses every run of whitespace to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
