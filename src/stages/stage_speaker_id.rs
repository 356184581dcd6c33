use tracing::{debug, warn};

use super::parse_transcript;
use crate::models::{ParsedTranscript, TranscriptTurn, distinct_speakers};

/// Pick the label that represents the sales rep
///
/// An explicit override always wins. Without one, the first speaker in turn
/// order is assumed to be the rep, since calls conventionally open with the
/// rep's greeting. Returns an empty label when there are no turns.
pub fn identify_me_speaker(turns: &[TranscriptTurn], override_speaker: Option<&str>) -> String {
    let speakers = distinct_speakers(turns);

    if let Some(wanted) = override_speaker.map(str::trim).filter(|s| !s.is_empty()) {
        return resolve_override(&speakers, wanted);
    }

    speakers.into_iter().next().unwrap_or_default()
}

/// Map an override onto an existing label when it only differs in case
fn resolve_override(speakers: &[String], wanted: &str) -> String {
    if let Some(exact) = speakers.iter().find(|s| s.as_str() == wanted) {
        return exact.clone();
    }

    let lowered = wanted.to_lowercase();
    if let Some(similar) = speakers
        .iter()
        .find(|s| s.trim().to_lowercase() == lowered)
    {
        debug!("Resolved speaker override {:?} to {:?}", wanted, similar);
        return similar.clone();
    }

    if !speakers.is_empty() {
        warn!(
            "Speaker override {:?} not found in transcript (speakers: {:?}); using it as given",
            wanted, speakers
        );
    }
    wanted.to_string()
}

/// Parse raw text and identify the rep in one step
pub fn build_parsed_transcript(raw: &str, override_speaker: Option<&str>) -> ParsedTranscript {
    let turns = parse_transcript(raw);
    let speakers = distinct_speakers(&turns);
    let me_speaker = identify_me_speaker(&turns, override_speaker);

    debug!(
        "Parsed {} turns from {} speakers, rep = {:?}",
        turns.len(),
        speakers.len(),
        me_speaker
    );

    ParsedTranscript {
        turn_count: turns.len(),
        turns,
        speakers,
        me_speaker,
    }
}
