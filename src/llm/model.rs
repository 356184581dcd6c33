use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{
    AnthropicClient, COACHING_SYSTEM_PROMPT, INTERPRETATION_SYSTEM_PROMPT,
    build_coaching_prompt, build_interpretation_prompt, coaching_tool, interpretation_tool,
};
use crate::models::{AnalysisSummary, CoachingNarrative, Interpretation, ParsedTranscript, TalkMetrics};

/// Prompt-size limit for the transcript part of the interpretation request
pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 60_000;

/// Summary and narrative returned together by the coaching call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmCoaching {
    pub summary: AnalysisSummary,
    pub coaching: CoachingNarrative,
}

/// The generative half of the pipeline
///
/// Implemented by [`AnthropicClient`]; tests plug in a stub.
#[allow(async_fn_in_trait)]
pub trait CoachingModel {
    async fn interpret(
        &self,
        parsed: &ParsedTranscript,
        metrics: &TalkMetrics,
    ) -> Result<Interpretation>;

    async fn coach(
        &self,
        interpretation: &Interpretation,
        metrics: &TalkMetrics,
    ) -> Result<LlmCoaching>;
}

impl CoachingModel for AnthropicClient {
    async fn interpret(
        &self,
        parsed: &ParsedTranscript,
        metrics: &TalkMetrics,
    ) -> Result<Interpretation> {
        let prompt = build_interpretation_prompt(parsed, metrics, DEFAULT_MAX_TRANSCRIPT_CHARS);
        let interpretation = self
            .send_with_tool(INTERPRETATION_SYSTEM_PROMPT, &prompt, interpretation_tool())
            .await?;
        Ok(interpretation)
    }

    async fn coach(
        &self,
        interpretation: &Interpretation,
        metrics: &TalkMetrics,
    ) -> Result<LlmCoaching> {
        let prompt = build_coaching_prompt(interpretation, metrics);
        let coaching = self
            .send_with_tool(COACHING_SYSTEM_PROMPT, &prompt, coaching_tool())
            .await?;
        Ok(coaching)
    }
}
