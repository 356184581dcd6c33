use anyhow::Result;
use tracing::info;

use super::{
    InterpretStageConfig, build_fallback_coaching_narrative, build_parsed_transcript,
    calculate_talk_metrics, execute_interpretation, execute_llm_coaching,
    resolve_coaching_narrative,
};
use crate::heuristics::FillerVocabulary;
use crate::llm::CoachingModel;
use crate::models::{
    FullAnalysisResult, Interpretation, NarrativeSource, ParsedTranscript, TalkMetrics,
};

/// Configuration for a whole analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Caller-supplied rep label; bypasses the first-speaker heuristic
    pub me_speaker: Option<String>,
    /// Filler terms counted in the rep's speech
    pub fillers: FillerVocabulary,
    /// Use the local fallback narrative even when a model is available
    pub skip_llm_narrative: bool,
    /// LLM stage settings
    pub interpret: InterpretStageConfig,
}

/// Output of the purely local stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAnalysis {
    pub parsed: ParsedTranscript,
    pub metrics: TalkMetrics,
}

/// Run the parser, speaker identification and metrics
pub fn analyze_locally(raw: &str, config: &AnalysisConfig) -> LocalAnalysis {
    let parsed = build_parsed_transcript(raw, config.me_speaker.as_deref());
    let metrics = calculate_talk_metrics(&parsed, &config.fillers);

    info!(
        "Local analysis: {} turns, {} speakers, rep {:?} at {}% talk",
        parsed.turn_count,
        parsed.speakers.len(),
        parsed.me_speaker,
        metrics.talk_ratio_me
    );

    LocalAnalysis { parsed, metrics }
}

/// Analyse a transcript without any model, using a supplied interpretation
///
/// The coaching narrative always comes from the local fallback builder and
/// there is no summary.
pub fn analyze_offline(
    raw: &str,
    interpretation: Interpretation,
    config: &AnalysisConfig,
) -> FullAnalysisResult {
    let LocalAnalysis { parsed, metrics } = analyze_locally(raw, config);
    let coaching = build_fallback_coaching_narrative(&interpretation, &metrics);

    FullAnalysisResult::new(
        parsed,
        metrics,
        interpretation,
        None,
        coaching,
        NarrativeSource::Fallback,
    )
}

/// Analyse a transcript with a model for the generative stages
///
/// Local stages always run first. The interpretation is the supplied one if
/// given, otherwise the model's; failing to get one is the only error. The
/// narrative falls back to the local builder when the coaching call is
/// skipped or fails.
pub async fn analyze_with_model<M: CoachingModel>(
    raw: &str,
    model: &M,
    interpretation: Option<Interpretation>,
    config: &AnalysisConfig,
) -> Result<FullAnalysisResult> {
    let LocalAnalysis { parsed, metrics } = analyze_locally(raw, config);

    let interpretation = match interpretation {
        Some(interpretation) => interpretation,
        None => execute_interpretation(model, &parsed, &metrics, &config.interpret).await?,
    };

    let mut summary = None;
    let llm_narrative = if config.skip_llm_narrative {
        None
    } else {
        Some(
            execute_llm_coaching(model, &interpretation, &metrics, &config.interpret)
                .await
                .map(|llm| {
                    summary = Some(llm.summary);
                    llm.coaching
                }),
        )
    };

    let (coaching, source) = resolve_coaching_narrative(llm_narrative, &interpretation, &metrics);

    Ok(FullAnalysisResult::new(
        parsed,
        metrics,
        interpretation,
        summary,
        coaching,
        source,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmCoaching;
    use crate::models::{AnalysisSummary, CoachingNarrative, ObjectionItem, Quality};
    use crate::stages::stage2_interpret::test_support::ScriptedModel;

    const CALL: &str = "Rep: Dobrý den, jako volám ohledně nabídky, jako prostě ehm\n\
                        Client: Dobrý den\n\
                        Rep: Takže jako máte chvilku?";

    fn interpretation() -> Interpretation {
        Interpretation {
            score: 48,
            strengths: vec!["Polite opening".to_string()],
            weaknesses: vec!["No discovery questions".to_string()],
            objections_handled: vec![ObjectionItem {
                objection: "Nemám čas".to_string(),
                response: String::new(),
                quality: Quality::Missed,
            }],
            ..Default::default()
        }
    }

    fn llm_coaching() -> LlmCoaching {
        LlmCoaching {
            summary: AnalysisSummary {
                overview: "Cold call".to_string(),
                ..Default::default()
            },
            coaching: CoachingNarrative {
                narrative: "From the model.".to_string(),
                motivational_close: "Go.".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_analyze_offline_uses_fallback() {
        let result = analyze_offline(CALL, interpretation(), &AnalysisConfig::default());

        assert_eq!(result.parsed_transcript.turn_count, 3);
        assert_eq!(result.parsed_transcript.me_speaker, "Rep");
        assert!(result.used_fallback());
        assert!(result.summary.is_none());
        assert_eq!(result.metrics.filler_words.get("jako"), Some(3));
        assert!(result.coaching.narrative.starts_with("Average call"));
        assert_eq!(result.coaching.practice_scenarios.len(), 1);
    }

    #[test]
    fn test_analyze_offline_empty_transcript() {
        let result = analyze_offline("", Interpretation::default(), &AnalysisConfig::default());

        assert_eq!(result.parsed_transcript.turn_count, 0);
        assert_eq!(result.metrics, TalkMetrics::default());
        assert!(result.coaching.actions.is_empty());
    }

    #[test]
    fn test_override_flows_into_metrics() {
        let config = AnalysisConfig {
            me_speaker: Some("Client".to_string()),
            ..Default::default()
        };
        let local = analyze_locally(CALL, &config);

        assert_eq!(local.parsed.me_speaker, "Client");
        assert_eq!(local.metrics.total_words_me, 2);
        assert!(local.metrics.filler_words.is_empty());
    }

    #[tokio::test]
    async fn test_model_path_uses_llm_narrative() {
        let model = ScriptedModel::new(vec![Ok(interpretation())], vec![Ok(llm_coaching())]);

        let result = analyze_with_model(CALL, &model, None, &AnalysisConfig::default())
            .await
            .unwrap();

        assert_eq!(result.metadata.narrative_source, NarrativeSource::Llm);
        assert_eq!(result.coaching.narrative, "From the model.");
        assert_eq!(result.summary.unwrap().overview, "Cold call");
        assert_eq!(result.interpretation.score, 48);
    }

    #[tokio::test]
    async fn test_model_coaching_failure_falls_back() {
        let model = ScriptedModel::new(vec![Ok(interpretation())], vec![]);
        let config = AnalysisConfig {
            interpret: InterpretStageConfig {
                max_retries: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let result = analyze_with_model(CALL, &model, None, &config).await.unwrap();

        assert!(result.used_fallback());
        assert!(result.summary.is_none());
        assert_eq!(model.coach_calls(), 2);
        assert!(result.coaching.narrative.contains("48/100"));
    }

    #[tokio::test]
    async fn test_supplied_interpretation_skips_model_interpret() {
        let model = ScriptedModel::new(vec![], vec![Ok(llm_coaching())]);

        let result = analyze_with_model(CALL, &model, Some(interpretation()), &AnalysisConfig::default())
            .await
            .unwrap();

        assert_eq!(model.interpret_calls(), 0);
        assert_eq!(result.metadata.narrative_source, NarrativeSource::Llm);
    }

    #[tokio::test]
    async fn test_skip_llm_narrative() {
        let model = ScriptedModel::new(vec![Ok(interpretation())], vec![Ok(llm_coaching())]);
        let config = AnalysisConfig {
            skip_llm_narrative: true,
            ..Default::default()
        };

        let result = analyze_with_model(CALL, &model, None, &config).await.unwrap();

        assert_eq!(model.coach_calls(), 0);
        assert!(result.used_fallback());
    }

    #[tokio::test]
    async fn test_no_interpretation_is_error() {
        let model = ScriptedModel::new(vec![], vec![]);
        let config = AnalysisConfig {
            interpret: InterpretStageConfig {
                max_retries: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let result = analyze_with_model(CALL, &model, None, &config).await;
        assert!(result.is_err());
    }
}
