/// German words and phrases that mark a question when they occur in a sentence.
///
/// Kept in lexicographic (byte) order; detection reports matches in this order.
pub const QUESTION_WORDS: &[&str] = &[
    "gibt es",
    "mit wem",
    "seit wann",
    "wann",
    "warum",
    "was",
    "welche",
    "welchem",
    "welchen",
    "welcher",
    "welches",
    "wem",
    "wen",
    "wer",
    "weshalb",
    "wessen",
    "weswegen",
    "wie",
    "wie lange",
    "wie viel",
    "wie viele",
    "wieso",
    "wieweit",
    "wo",
    "wobei",
    "wodurch",
    "wofür",
    "wogegen",
    "woher",
    "wohin",
    "wohinter",
    "womit",
    "woneben",
    "woran",
    "worauf",
    "woraus",
    "worin",
    "worum",
    "worunter",
    "worüber",
    "wovon",
    "wovor",
    "wozu",
];
