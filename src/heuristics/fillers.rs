use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::words::{count_phrase, normalized_words};
use crate::models::FillerWordCounts;

/// Languages with a built-in filler vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Czech,
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cs" | "cz" | "czech" => Ok(Language::Czech),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language: {other} (expected cs or en)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Czech => f.write_str("cs"),
            Language::English => f.write_str("en"),
        }
    }
}

/// Filler terms to look for in the rep's speech
///
/// Terms may be multi-word ("you know"); matching is case-insensitive on
/// whole words. Term order is the order counts are reported in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerVocabulary {
    terms: Vec<String>,
}

impl Default for FillerVocabulary {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl FillerVocabulary {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Czech => Self::czech(),
            Language::English => Self::english(),
        }
    }

    pub fn czech() -> Self {
        Self::custom([
            "ehm",
            "hm",
            "eh",
            "em",
            "jako",
            "jakoby",
            "prostě",
            "vlastně",
            "takže",
            "no",
            "v podstatě",
            "tak nějak",
            "že jo",
            "zkrátka",
        ])
    }

    pub fn english() -> Self {
        Self::custom([
            "um",
            "uh",
            "er",
            "ah",
            "like",
            "you know",
            "i mean",
            "basically",
            "actually",
            "literally",
            "kind of",
            "sort of",
        ])
    }

    /// Build a vocabulary from arbitrary terms; blanks and duplicates are dropped
    pub fn custom<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for term in terms {
            let term = normalized_words(term.as_ref()).join(" ");
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self { terms: normalized }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Count every vocabulary term in `text`; terms that never occur are omitted
    pub fn count_in(&self, text: &str) -> FillerWordCounts {
        let words = normalized_words(text);
        let mut counts = FillerWordCounts::new();

        for term in &self.terms {
            let phrase: Vec<String> = term.split(' ').map(str::to_string).collect();
            let count = count_phrase(&words, &phrase);
            if count > 0 {
                counts.add(term, count);
            }
        }

        counts
    }
}
