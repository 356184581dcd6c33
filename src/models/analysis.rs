use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AnalysisSummary, CoachingNarrative, Interpretation, NarrativeSource, ParsedTranscript,
    TalkMetrics,
};

/// Bookkeeping about one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// Unique identifier for this run (UUID)
    pub analysis_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub turn_count: usize,
    pub speaker_count: usize,
    /// Where the coaching narrative came from
    pub narrative_source: NarrativeSource,
}

/// One completed analysis of one call transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysisResult {
    pub parsed_transcript: ParsedTranscript,
    pub metrics: TalkMetrics,
    pub interpretation: Interpretation,
    /// Only present when the LLM coaching call succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<AnalysisSummary>,
    pub coaching: CoachingNarrative,
    pub metadata: AnalysisMetadata,
}

impl FullAnalysisResult {
    pub fn new(
        parsed_transcript: ParsedTranscript,
        metrics: TalkMetrics,
        interpretation: Interpretation,
        summary: Option<AnalysisSummary>,
        coaching: CoachingNarrative,
        narrative_source: NarrativeSource,
    ) -> Self {
        let metadata = AnalysisMetadata {
            analysis_id: Uuid::new_v4().to_string(),
            analyzed_at: Utc::now(),
            turn_count: parsed_transcript.turn_count,
            speaker_count: parsed_transcript.speakers.len(),
            narrative_source,
        };

        Self {
            parsed_transcript,
            metrics,
            interpretation,
            summary,
            coaching,
            metadata,
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.metadata.narrative_source == NarrativeSource::Fallback
    }
}
