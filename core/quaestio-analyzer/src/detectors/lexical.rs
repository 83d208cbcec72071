use crate::lexicon::QUESTION_WORDS;
use crate::result::SentenceAnalysis;

/// Lexicon entries occurring anywhere in `text`, ignoring case.
///
/// Plain substring containment, so "was" also fires inside "etwas".
pub fn find_question_words(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    QUESTION_WORDS.iter().copied().filter(|word| lowered.contains(word)).collect()
}

pub fn detect(analysis: &mut SentenceAnalysis) {
    for word in find_question_words(analysis.text()) {
        analysis.add_question_word(word);
    }
}
