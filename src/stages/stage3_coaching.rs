use tracing::{info, warn};

use crate::models::{
    CoachingAction, CoachingNarrative, Interpretation, NarrativeSource, PracticeScenario, Priority,
    Quality, TalkMetrics,
};

/// Talk ratio above which the rep is told to talk less
pub const TALK_RATIO_LIMIT: u32 = 60;
/// Filler rate above which filler words become an action
pub const FILLER_RATE_LIMIT: u32 = 3;
/// Filler rate above which the filler action is high priority
pub const FILLER_RATE_HIGH: u32 = 5;
/// How many weaknesses become "area to improve" actions
pub const MAX_WEAKNESS_ACTIONS: usize = 2;
/// How many weak/missed objections become practice scenarios
pub const MAX_PRACTICE_SCENARIOS: usize = 2;
/// How much of a weak response is quoted back
pub const RESPONSE_EXCERPT_CHARS: usize = 60;

pub const CLOSE_SOLID: &str =
    "Great work. Keep this standard and sharpen the details on your next call.";
pub const CLOSE_AVERAGE: &str =
    "You're on the right track. Every call is a chance to get one thing better.";
pub const CLOSE_WEAK: &str =
    "Every strong rep started somewhere. Pick one action and practise it on your next call.";

/// Score bands used for wording and the closing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Solid,
    Average,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            70.. => ScoreBand::Solid,
            40..=69 => ScoreBand::Average,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Solid => "Solid",
            ScoreBand::Average => "Average",
            ScoreBand::Weak => "Weak",
        }
    }

    pub fn motivational_close(self) -> &'static str {
        match self {
            ScoreBand::Solid => CLOSE_SOLID,
            ScoreBand::Average => CLOSE_AVERAGE,
            ScoreBand::Weak => CLOSE_WEAK,
        }
    }
}

/// Build a complete coaching narrative locally
///
/// Used whenever the LLM narrative is skipped or failed. Pure, deterministic
/// and total over any interpretation/metrics pair.
pub fn build_fallback_coaching_narrative(
    interpretation: &Interpretation,
    metrics: &TalkMetrics,
) -> CoachingNarrative {
    let band = ScoreBand::from_score(interpretation.score);
    let actions = build_actions(interpretation, metrics);
    let practice_scenarios = build_practice_scenarios(interpretation);
    let narrative = build_narrative(interpretation, band, actions.len());

    CoachingNarrative {
        narrative,
        actions,
        practice_scenarios,
        motivational_close: band.motivational_close().to_string(),
    }
}

fn build_actions(interpretation: &Interpretation, metrics: &TalkMetrics) -> Vec<CoachingAction> {
    let mut actions = Vec::new();

    if metrics.talk_ratio_me > TALK_RATIO_LIMIT {
        actions.push(CoachingAction::new(
            "Reduce talking ratio",
            format!(
                "You spoke {}% of the time. Aim for 30-40%: after each question, \
                 pause about 3 seconds longer and let the prospect fill the silence.",
                metrics.talk_ratio_me
            ),
            Priority::High,
        ));
    }

    if metrics.filler_word_rate > FILLER_RATE_LIMIT {
        let priority = if metrics.filler_word_rate > FILLER_RATE_HIGH {
            Priority::High
        } else {
            Priority::Medium
        };
        let top = metrics
            .filler_words
            .top(3)
            .into_iter()
            .map(|(term, count)| format!("\"{}\" ({}x)", term, count))
            .collect::<Vec<_>>();

        let description = if top.is_empty() {
            format!(
                "Filler words make up {}% of your speech. Replace them with a short pause.",
                metrics.filler_word_rate
            )
        } else {
            format!(
                "Filler words make up {}% of your speech. Most frequent: {}. \
                 Replace them with a short pause.",
                metrics.filler_word_rate,
                top.join(", ")
            )
        };

        actions.push(CoachingAction::new("Reduce filler words", description, priority));
    }

    for weakness in interpretation
        .weaknesses
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .take(MAX_WEAKNESS_ACTIONS)
    {
        actions.push(CoachingAction::new("Area to improve", weakness, Priority::Medium));
    }

    actions
}

fn build_practice_scenarios(interpretation: &Interpretation) -> Vec<PracticeScenario> {
    interpretation
        .objections_handled
        .iter()
        .filter(|item| item.quality.needs_practice())
        .take(MAX_PRACTICE_SCENARIOS)
        .map(|item| {
            let better_approach = match item.quality {
                Quality::Missed => "Next time, respond by validating the feeling and asking \
                                    an open question."
                    .to_string(),
                _ => {
                    let opening = if item.response.trim().is_empty() {
                        "Your response could be stronger.".to_string()
                    } else {
                        format!(
                            "Your response \"{}\" could be stronger.",
                            excerpt(&item.response, RESPONSE_EXCERPT_CHARS)
                        )
                    };
                    format!(
                        "{} Acknowledge the concern first, then reframe it around the value \
                         for the prospect and follow up with an open question.",
                        opening
                    )
                }
            };
            PracticeScenario {
                situation: format!("The prospect objects: \"{}\"", item.objection.trim()),
                better_approach,
            }
        })
        .collect()
}

fn build_narrative(interpretation: &Interpretation, band: ScoreBand, action_count: usize) -> String {
    let mut sentences = vec![format!(
        "{} call with a score of {}/100.",
        band.label(),
        interpretation.score
    )];

    if let Some(strength) = first_non_blank(&interpretation.strengths) {
        sentences.push(format!("Your strongest point: {}.", strength));
    }

    if let Some(weakness) = first_non_blank(&interpretation.weaknesses) {
        sentences.push(format!("Biggest opportunity: {}.", weakness));
    }

    sentences.push(match action_count {
        0 => "No specific action items this time.".to_string(),
        1 => "Focus on the 1 action item below.".to_string(),
        n => format!("Focus on the {} action items below.", n),
    });

    sentences.join(" ")
}

/// First non-blank entry with trailing sentence punctuation removed
fn first_non_blank(items: &[String]) -> Option<&str> {
    items
        .iter()
        .map(|s| s.trim().trim_end_matches(['.', '!', '?']).trim_end())
        .find(|s| !s.is_empty())
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Use the LLM narrative when there is one, otherwise build the fallback
pub fn resolve_coaching_narrative(
    llm_narrative: Option<anyhow::Result<CoachingNarrative>>,
    interpretation: &Interpretation,
    metrics: &TalkMetrics,
) -> (CoachingNarrative, NarrativeSource) {
    match llm_narrative {
        Some(Ok(narrative)) => (narrative, NarrativeSource::Llm),
        Some(Err(e)) => {
            warn!("LLM coaching failed, using local fallback: {:#}", e);
            (
                build_fallback_coaching_narrative(interpretation, metrics),
                NarrativeSource::Fallback,
            )
        }
        None => {
            info!("LLM coaching not requested, using local fallback");
            (
                build_fallback_coaching_narrative(interpretation, metrics),
                NarrativeSource::Fallback,
            )
        }
    }
}
