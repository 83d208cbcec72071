use quaestio_protocol::TokenIndex;
use quaestio_semgraph::DependencyGraph;
use serde::{Serialize, Serializer};
use std::fmt;

/// A verb that precedes its own subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPhrase {
    pub verb: TokenIndex,
    pub verb_form: String,
    pub subject: TokenIndex,
    pub subject_form: String,
}

/// `2. kommst -> 3. du`
impl fmt::Display for QuestionPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} -> {}. {}", self.verb, self.verb_form, self.subject, self.subject_form)
    }
}

impl Serialize for QuestionPhrase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of analyzing one sentence.
///
/// Built by the analyzer, filled in by the detectors, then handed out read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceAnalysis {
    text: String,
    graph: Option<DependencyGraph>,
    question_words: Vec<&'static str>,
    question_phrases: Vec<QuestionPhrase>,
}

impl SentenceAnalysis {
    pub(crate) fn new(graph: DependencyGraph) -> Self {
        Self {
            text: graph.sentence_text(),
            graph: Some(graph),
            question_words: Vec::new(),
            question_phrases: Vec::new(),
        }
    }

    /// Result returned in place of everything else when the analysis fails.
    pub(crate) fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            graph: None,
            question_words: Vec::new(),
            question_phrases: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `None` only for the fallback result.
    pub fn graph(&self) -> Option<&DependencyGraph> {
        self.graph.as_ref()
    }

    pub fn contains_question_words(&self) -> bool {
        !self.question_words.is_empty()
    }

    /// Matched lexicon entries, in detection order.
    pub fn question_words(&self) -> &[&'static str] {
        &self.question_words
    }

    pub fn contains_question_syntax(&self) -> bool {
        !self.question_phrases.is_empty()
    }

    pub fn question_phrases(&self) -> &[QuestionPhrase] {
        &self.question_phrases
    }

    pub(crate) fn add_question_word(&mut self, word: &'static str) {
        self.question_words.push(word);
    }

    pub(crate) fn add_question_phrase(&mut self, phrase: QuestionPhrase) {
        self.question_phrases.push(phrase);
    }

    /// Serializable view; the graph is embedded only when asked for.
    pub fn report(&self, include_graph: bool) -> AnalysisReport<'_> {
        AnalysisReport {
            text: &self.text,
            contains_question_words: self.contains_question_words(),
            question_words: non_empty(&self.question_words),
            contains_question_syntax: self.contains_question_syntax(),
            question_phrases: non_empty(&self.question_phrases),
            semantic_graph: include_graph.then(|| self.graph.as_ref()),
        }
    }
}

impl Serialize for SentenceAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.report(false).serialize(serializer)
    }
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    (!items.is_empty()).then_some(items)
}

/// JSON shape of one result. Empty lists are `null`, as the REST service sent them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    pub text: &'a str,
    pub contains_question_words: bool,
    pub question_words: Option<&'a [&'static str]>,
    pub contains_question_syntax: bool,
    pub question_phrases: Option<&'a [QuestionPhrase]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_graph: Option<Option<&'a DependencyGraph>>,
}
