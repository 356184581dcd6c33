use tracing::debug;

use crate::heuristics::FillerVocabulary;
use crate::models::{FillerWordCounts, ParsedTranscript, TalkMetrics, TranscriptTurn};

/// Integer percentage of `part` in `whole`, rounding halves up; 0 when `whole` is 0
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // f64::round rounds half away from zero, which is half-up for non-negatives
    (part as f64 * 100.0 / whole as f64).round() as u32
}

/// Compute talk ratio and filler statistics
///
/// Every turn whose speaker equals `me_speaker` counts toward the rep; all
/// other speakers are pooled as the prospect. Filler words are only counted
/// in the rep's speech. Never fails; an empty transcript yields all zeros.
pub fn calculate_talk_metrics(
    parsed: &ParsedTranscript,
    vocabulary: &FillerVocabulary,
) -> TalkMetrics {
    let total_words_me: usize = parsed.me_turns().map(TranscriptTurn::word_count).sum();
    let total_words_prospect: usize =
        parsed.prospect_turns().map(TranscriptTurn::word_count).sum();

    let mut filler_words = FillerWordCounts::new();
    for turn in parsed.me_turns() {
        for (term, count) in vocabulary.count_in(&turn.text).iter() {
            filler_words.add(term, count);
        }
    }

    // Re-key into vocabulary order so the report order doesn't depend on
    // which turn mentioned a term first
    let filler_words: FillerWordCounts = vocabulary
        .terms()
        .iter()
        .filter_map(|term| filler_words.get(term).map(|c| (term.as_str(), c)))
        .collect();

    let total = total_words_me + total_words_prospect;
    let talk_ratio_me = percentage(total_words_me, total);
    let talk_ratio_prospect = if total == 0 { 0 } else { 100 - talk_ratio_me };
    let filler_word_rate = percentage(filler_words.total(), total_words_me);

    debug!(
        "Talk ratio {}/{} ({} vs {} words), filler rate {}%",
        talk_ratio_me, talk_ratio_prospect, total_words_me, total_words_prospect, filler_word_rate
    );

    TalkMetrics {
        talk_ratio_me,
        talk_ratio_prospect,
        total_words_me,
        total_words_prospect,
        filler_words,
        filler_word_rate,
        turn_count: parsed.turn_count,
    }
}
