/// Count whitespace-separated words, ignoring empty tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Normalise a single word for vocabulary matching
///
/// Lower-cases and strips leading/trailing characters that are not letters or
/// digits, so `"Jako,"` and `"(jako)"` both become `"jako"`. Inner hyphens
/// and apostrophes are kept.
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Split text into normalised words, dropping tokens that normalise to nothing
pub fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Count occurrences of a (possibly multi-word) phrase in a normalised word list
pub fn count_phrase(words: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > words.len() {
        return 0;
    }
    words
        .windows(phrase.len())
        .filter(|window| window.iter().zip(phrase).all(|(w, p)| w == p))
        .count()
}
