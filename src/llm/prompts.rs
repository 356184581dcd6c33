use serde_json::json;

use super::ToolSpec;
use crate::models::{Interpretation, ParsedTranscript, TalkMetrics};

pub const INTERPRETATION_TOOL: &str = "submit_interpretation";
pub const COACHING_TOOL: &str = "submit_coaching";

/// System prompt for the interpretation call
pub const INTERPRETATION_SYSTEM_PROMPT: &str = r#"You are an experienced B2B sales coach reviewing a transcript of a sales call.

The speaker marked (REP) is the sales representative; everyone else is the prospect side.
Talk ratio and filler-word statistics have already been computed and are given to you. Do not recompute them; interpret them.

Evaluate the call:
1. Give an overall score from 0 to 100.
2. Score each category (opening, discovery, presentation, objection_handling, closing) from 0 to 100 with a one-sentence note.
3. List strengths and weaknesses, most important first. Be specific and quote the call where you can.
4. Analyse SPIN coverage for the phases situation, problem, implication and need_payoff: count the rep's questions in each phase, give up to 3 verbatim examples and a quality label.
5. List the questions the rep asked and the objections the prospect raised, each with a quality label.

QUALITY LABELS (use only these): strong, good, adequate, weak, missed.
Use "missed" for an objection the rep did not respond to at all.

Write all free text in the language of the transcript.
Use the submit_interpretation tool to return your analysis."#;

/// System prompt for the summary + coaching narrative call
pub const COACHING_SYSTEM_PROMPT: &str = r#"You are a supportive but direct sales coach writing feedback for a sales representative after a call.

You receive a structured evaluation of the call plus talk statistics. Based only on that:
1. Write a short summary of the call: overview, key moments, agreed or recommended next steps, and the prospect's sentiment.
2. Write a one-paragraph coaching narrative addressed to the rep.
3. Give at most 5 concrete actions, each with a title, description and priority (high, medium, low). Most important first.
4. Give up to 3 practice scenarios taken from weak or missed moments of the call, each with the situation and a better approach.
5. End with one motivational closing sentence.

Write in the language of the evaluation's free text.
Use the submit_coaching tool to return your feedback."#;

/// Render the transcript for a prompt, marking the rep's turns
///
/// Output is cut at `max_chars` on a turn boundary; a note says how many
/// turns were left out.
pub fn format_transcript_for_prompt(parsed: &ParsedTranscript, max_chars: usize) -> String {
    let mut out = String::new();

    for (i, turn) in parsed.turns.iter().enumerate() {
        let role = if parsed.is_me(turn) { " (REP)" } else { "" };
        let line = match &turn.timestamp {
            Some(ts) => format!("[{}] {}{}: {}\n", ts, turn.speaker, role, turn.text),
            None => format!("{}{}: {}\n", turn.speaker, role, turn.text),
        };

        if out.len() + line.len() > max_chars {
            out.push_str(&format!(
                "[... {} more turns omitted ...]\n",
                parsed.turns.len() - i
            ));
            break;
        }
        out.push_str(&line);
    }

    out
}

fn format_metrics(metrics: &TalkMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "- Talk ratio: rep {}%, prospect {}% ({} vs {} words)\n",
        metrics.talk_ratio_me,
        metrics.talk_ratio_prospect,
        metrics.total_words_me,
        metrics.total_words_prospect
    ));
    out.push_str(&format!(
        "- Filler-word rate: {}% of the rep's words\n",
        metrics.filler_word_rate
    ));
    if !metrics.filler_words.is_empty() {
        let fillers: Vec<String> = metrics
            .filler_words
            .iter()
            .map(|(term, count)| format!("\"{}\" {}x", term, count))
            .collect();
        out.push_str(&format!("- Filler words: {}\n", fillers.join(", ")));
    }
    out.push_str(&format!("- Turns: {}\n", metrics.turn_count));
    out
}

/// Build the user prompt for the interpretation call
pub fn build_interpretation_prompt(
    parsed: &ParsedTranscript,
    metrics: &TalkMetrics,
    max_transcript_chars: usize,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("# Call\n");
    prompt.push_str(&format!("Sales rep: {}\n", parsed.me_speaker));
    prompt.push_str(&format!("Speakers: {}\n\n", parsed.speakers.join(", ")));

    prompt.push_str("## Statistics\n");
    prompt.push_str(&format_metrics(metrics));
    prompt.push('\n');

    prompt.push_str("## Transcript\n");
    prompt.push_str(&format_transcript_for_prompt(parsed, max_transcript_chars));
    prompt.push('\n');

    prompt.push_str("Evaluate the call and submit your analysis with the submit_interpretation tool.\n");
    prompt
}

/// Build the user prompt for the coaching call
pub fn build_coaching_prompt(interpretation: &Interpretation, metrics: &TalkMetrics) -> String {
    let mut prompt = String::new();

    prompt.push_str("# Evaluation\n```json\n");
    let evaluation =
        serde_json::to_string_pretty(interpretation).unwrap_or_else(|_| "{}".to_string());
    prompt.push_str(&evaluation);
    prompt.push_str("\n```\n\n");

    prompt.push_str("## Statistics\n");
    prompt.push_str(&format_metrics(metrics));
    prompt.push('\n');

    prompt.push_str("Write the summary and coaching and submit them with the submit_coaching tool.\n");
    prompt
}

fn quality_schema() -> serde_json::Value {
    json!({"type": "string", "enum": ["strong", "good", "adequate", "weak", "missed"]})
}

/// Tool definition for structured interpretation output
pub fn interpretation_tool() -> ToolSpec {
    ToolSpec {
        name: INTERPRETATION_TOOL.to_string(),
        description: "Submit the structured evaluation of the sales call".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "score": {"type": "integer", "minimum": 0, "maximum": 100},
                "categoryScores": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "score": {"type": "integer", "minimum": 0, "maximum": 100},
                            "note": {"type": "string"}
                        },
                        "required": ["score", "note"]
                    }
                },
                "strengths": {"type": "array", "items": {"type": "string"}},
                "weaknesses": {"type": "array", "items": {"type": "string"}},
                "fillerWordsAnalysis": {"type": "string"},
                "talkRatioAnalysis": {"type": "string"},
                "spinCoverage": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "count": {"type": "integer", "minimum": 0},
                            "examples": {"type": "array", "items": {"type": "string"}},
                            "quality": quality_schema()
                        },
                        "required": ["count", "examples", "quality"]
                    }
                },
                "questionsAsked": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": {"type": "string"},
                            "spinPhase": {"type": "string"},
                            "quality": quality_schema()
                        },
                        "required": ["question", "quality"]
                    }
                },
                "objectionsHandled": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "objection": {"type": "string"},
                            "response": {"type": "string"},
                            "quality": quality_schema()
                        },
                        "required": ["objection", "response", "quality"]
                    }
                }
            },
            "required": ["score", "categoryScores", "strengths", "weaknesses", "spinCoverage", "questionsAsked", "objectionsHandled"]
        }),
    }
}

/// Tool definition for the summary + coaching narrative output
pub fn coaching_tool() -> ToolSpec {
    ToolSpec {
        name: COACHING_TOOL.to_string(),
        description: "Submit the call summary and coaching feedback".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "object",
                    "properties": {
                        "overview": {"type": "string"},
                        "keyMoments": {"type": "array", "items": {"type": "string"}},
                        "nextSteps": {"type": "array", "items": {"type": "string"}},
                        "prospectSentiment": {"type": "string"}
                    },
                    "required": ["overview", "keyMoments", "nextSteps"]
                },
                "coaching": {
                    "type": "object",
                    "properties": {
                        "narrative": {"type": "string"},
                        "actions": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "title": {"type": "string"},
                                    "description": {"type": "string"},
                                    "priority": {"type": "string", "enum": ["high", "medium", "low"]}
                                },
                                "required": ["title", "description", "priority"]
                            }
                        },
                        "practiceScenarios": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "situation": {"type": "string"},
                                    "betterApproach": {"type": "string"}
                                },
                                "required": ["situation", "betterApproach"]
                            }
                        },
                        "motivationalClose": {"type": "string"}
                    },
                    "required": ["narrative", "actions", "practiceScenarios", "motivationalClose"]
                }
            },
            "required": ["summary", "coaching"]
        }),
    }
}
