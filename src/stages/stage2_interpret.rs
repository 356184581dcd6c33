use anyhow::Result;
use tracing::{info, warn};

use crate::llm::{CoachingModel, LlmCoaching, ValidationConfig, validate_coaching, validate_interpretation};
use crate::models::{Interpretation, ParsedTranscript, TalkMetrics};

/// Configuration for the LLM stage
#[derive(Debug, Clone)]
pub struct InterpretStageConfig {
    /// Validation configuration
    pub validation: ValidationConfig,
    /// Maximum retries per call on transport or validation failure
    pub max_retries: u32,
}

impl Default for InterpretStageConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            max_retries: 2,
        }
    }
}

/// Ask the model for an interpretation of the call
///
/// Each response is validated; invalid responses and errors are retried up
/// to `max_retries` times before the last error is returned.
pub async fn execute_interpretation<M: CoachingModel>(
    model: &M,
    parsed: &ParsedTranscript,
    metrics: &TalkMetrics,
    config: &InterpretStageConfig,
) -> Result<Interpretation> {
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            info!("Interpretation: retry {} of {}", attempt, config.max_retries);
        }

        match model.interpret(parsed, metrics).await {
            Ok(interpretation) => {
                let validation = validate_interpretation(&interpretation, &config.validation);
                if validation.is_valid {
                    info!(
                        "Interpretation: score {}, {} strengths, {} weaknesses",
                        interpretation.score,
                        interpretation.strengths.len(),
                        interpretation.weaknesses.len()
                    );
                    return Ok(interpretation);
                }
                warn!("Interpretation validation failed: {:?}", validation.errors);
                last_error = Some(anyhow::anyhow!(
                    "Validation failed: {:?}",
                    validation.errors
                ));
            }
            Err(e) => {
                warn!("Interpretation request failed: {:#}", e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown error")))
}

/// Ask the model for the summary and coaching narrative
pub async fn execute_llm_coaching<M: CoachingModel>(
    model: &M,
    interpretation: &Interpretation,
    metrics: &TalkMetrics,
    config: &InterpretStageConfig,
) -> Result<LlmCoaching> {
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            info!("Coaching: retry {} of {}", attempt, config.max_retries);
        }

        match model.coach(interpretation, metrics).await {
            Ok(coaching) => {
                let validation =
                    validate_coaching(&coaching.summary, &coaching.coaching, &config.validation);
                if validation.is_valid {
                    info!("Coaching: {} actions", coaching.coaching.actions.len());
                    return Ok(coaching);
                }
                warn!("Coaching validation failed: {:?}", validation.errors);
                last_error = Some(anyhow::anyhow!(
                    "Validation failed: {:?}",
                    validation.errors
                ));
            }
            Err(e) => {
                warn!("Coaching request failed: {:#}", e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown error")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use anyhow::Result;

    use crate::llm::{CoachingModel, LlmCoaching};
    use crate::models::{Interpretation, ParsedTranscript, TalkMetrics};

    /// Model that replays canned responses in order
    pub struct ScriptedModel {
        pub interpretations: Mutex<Vec<Result<Interpretation>>>,
        pub coachings: Mutex<Vec<Result<LlmCoaching>>>,
        pub interpret_calls: Mutex<usize>,
        pub coach_calls: Mutex<usize>,
    }

    impl ScriptedModel {
        pub fn new(
            interpretations: Vec<Result<Interpretation>>,
            coachings: Vec<Result<LlmCoaching>>,
        ) -> Self {
            Self {
                interpretations: Mutex::new(interpretations),
                coachings: Mutex::new(coachings),
                interpret_calls: Mutex::new(0),
                coach_calls: Mutex::new(0),
            }
        }

        pub fn interpret_calls(&self) -> usize {
            *self.interpret_calls.lock().unwrap()
        }

        pub fn coach_calls(&self) -> usize {
            *self.coach_calls.lock().unwrap()
        }
    }

    impl CoachingModel for ScriptedModel {
        async fn interpret(
            &self,
            _parsed: &ParsedTranscript,
            _metrics: &TalkMetrics,
        ) -> Result<Interpretation> {
            *self.interpret_calls.lock().unwrap() += 1;
            let mut queue = self.interpretations.lock().unwrap();
            if queue.is_empty() {
                anyhow::bail!("no scripted interpretation left");
            }
            queue.remove(0)
        }

        async fn coach(
            &self,
            _interpretation: &Interpretation,
            _metrics: &TalkMetrics,
        ) -> Result<LlmCoaching> {
            *self.coach_calls.lock().unwrap() += 1;
            let mut queue = self.coachings.lock().unwrap();
            if queue.is_empty() {
                anyhow::bail!("no scripted coaching left");
            }
            queue.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedModel;
    use super::*;
    use crate::models::{AnalysisSummary, CoachingNarrative};

    fn good_interpretation() -> Interpretation {
        Interpretation {
            score: 66,
            weaknesses: vec!["No next step agreed".to_string()],
            ..Default::default()
        }
    }

    fn good_coaching() -> LlmCoaching {
        LlmCoaching {
            summary: AnalysisSummary {
                overview: "Intro call".to_string(),
                ..Default::default()
            },
            coaching: CoachingNarrative {
                narrative: "Decent call.".to_string(),
                motivational_close: "Keep at it.".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_stage_config_default() {
        let config = InterpretStageConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.validation.max_score, 100);
    }

    #[tokio::test]
    async fn test_interpretation_retries_until_valid() {
        let invalid = Interpretation {
            score: 250,
            ..good_interpretation()
        };
        let model = ScriptedModel::new(
            vec![
                Err(anyhow::anyhow!("connection reset")),
                Ok(invalid),
                Ok(good_interpretation()),
            ],
            vec![],
        );

        let result = execute_interpretation(
            &model,
            &ParsedTranscript::default(),
            &TalkMetrics::default(),
            &InterpretStageConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.score, 66);
        assert_eq!(model.interpret_calls(), 3);
    }

    #[tokio::test]
    async fn test_interpretation_gives_up_after_retries() {
        let model = ScriptedModel::new(
            vec![
                Err(anyhow::anyhow!("first")),
                Err(anyhow::anyhow!("second")),
                Err(anyhow::anyhow!("third")),
                Ok(good_interpretation()),
            ],
            vec![],
        );

        let err = execute_interpretation(
            &model,
            &ParsedTranscript::default(),
            &TalkMetrics::default(),
            &InterpretStageConfig::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "third");
        assert_eq!(model.interpret_calls(), 3);
    }

    #[tokio::test]
    async fn test_coaching_validation_failure_is_error() {
        let model = ScriptedModel::new(vec![], vec![Ok(LlmCoaching::default())]);
        let config = InterpretStageConfig {
            max_retries: 0,
            ..Default::default()
        };

        let err = execute_llm_coaching(&model, &good_interpretation(), &TalkMetrics::default(), &config)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Validation failed"));
        assert_eq!(model.coach_calls(), 1);
    }

    #[tokio::test]
    async fn test_coaching_success() {
        let model = ScriptedModel::new(vec![], vec![Ok(good_coaching())]);

        let coaching = execute_llm_coaching(
            &model,
            &good_interpretation(),
            &TalkMetrics::default(),
            &InterpretStageConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(coaching.coaching.narrative, "Decent call.");
    }
}
