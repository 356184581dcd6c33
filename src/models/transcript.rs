use serde::{Deserialize, Serialize};

use crate::heuristics::count_words;

/// One utterance recovered from the raw transcript text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptTurn {
    /// Speaker label exactly as written in the source (trimmed)
    pub speaker: String,
    /// Utterance text, never empty
    pub text: String,
    /// Timestamp as written (`H:MM` or `H:MM:SS`), not parsed into a duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TranscriptTurn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(
        speaker: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    /// Append a continuation line to this turn, space-joined
    pub fn append_text(&mut self, continuation: &str) {
        let continuation = continuation.trim();
        if continuation.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(continuation);
    }

    /// Number of whitespace-separated words in this turn
    pub fn word_count(&self) -> usize {
        count_words(&self.text)
    }
}

/// Turns plus the speaker bookkeeping derived from them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTranscript {
    /// Turns in source order
    pub turns: Vec<TranscriptTurn>,
    /// Distinct speaker labels in first-seen order
    pub speakers: Vec<String>,
    /// Label identified as the sales rep
    pub me_speaker: String,
    /// Always equal to `turns.len()`
    pub turn_count: usize,
}

impl ParsedTranscript {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a turn belongs to the rep
    pub fn is_me(&self, turn: &TranscriptTurn) -> bool {
        turn.speaker == self.me_speaker
    }

    /// Turns spoken by the rep, in order
    pub fn me_turns(&self) -> impl Iterator<Item = &TranscriptTurn> {
        self.turns.iter().filter(|t| self.is_me(t))
    }

    /// Turns spoken by anyone other than the rep, in order
    pub fn prospect_turns(&self) -> impl Iterator<Item = &TranscriptTurn> {
        self.turns.iter().filter(|t| !self.is_me(t))
    }
}

/// Distinct speaker labels in the order they first appear
pub fn distinct_speakers(turns: &[TranscriptTurn]) -> Vec<String> {
    let mut speakers: Vec<String> = Vec::new();
    for turn in turns {
        if !speakers.iter().any(|s| *s == turn.speaker) {
            speakers.push(turn.speaker.clone());
        }
    }
    speakers
}
