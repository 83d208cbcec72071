use crate::error::AnalysisError;
use crate::result::{QuestionPhrase, SentenceAnalysis};
use crate::AnalyzerOptions;
use once_cell::sync::Lazy;
use quaestio_semgraph::{DependencyGraph, Matcher, NodePredicate, Pattern};
use tracing::trace;

const VERB: &str = "verb";
const SUBJECT: &str = "subject";

/// Any verb-class token governing any token through a `sb` (subject) edge.
///
/// Compiled once per process and shared read-only by every analysis.
pub static VERB_WITH_SUBJECT: Lazy<Pattern> = Lazy::new(|| {
    let mut builder = Pattern::builder();
    let verb = builder.node(VERB, NodePredicate::pos_prefix("V"));
    let subject = builder.node(SUBJECT, NodePredicate::Any);
    builder.edge(verb, "sb", subject);
    builder.build().expect("verb-subject pattern is well formed")
});

/// The first verb-subject match, reported only when the verb comes first.
///
/// Later matches are never examined, even if the first one is not inverted.
pub fn find_inversion(
    graph: &DependencyGraph,
    options: &AnalyzerOptions,
) -> Result<Option<QuestionPhrase>, AnalysisError> {
    let matcher = Matcher::new(&VERB_WITH_SUBJECT, graph).primary_edges_only(!options.secondary_edges);
    let Some(found) = matcher.find_first() else {
        return Ok(None);
    };

    let verb = found.get(VERB).ok_or(AnalysisError::MissingBinding(VERB))?;
    let subject = found.get(SUBJECT).ok_or(AnalysisError::MissingBinding(SUBJECT))?;
    trace!(verb = %verb.index, subject = %subject.index, "verb-subject match");

    if verb.index >= subject.index {
        return Ok(None);
    }

    Ok(Some(QuestionPhrase {
        verb: verb.index,
        verb_form: verb.form.clone(),
        subject: subject.index,
        subject_form: subject.form.clone(),
    }))
}

pub fn detect(analysis: &mut SentenceAnalysis, options: &AnalyzerOptions) -> Result<(), AnalysisError> {
    let Some(graph) = analysis.graph() else {
        return Ok(());
    };

    if let Some(phrase) = find_inversion(graph, options)? {
        analysis.add_question_phrase(phrase);
    }
    Ok(())
}
