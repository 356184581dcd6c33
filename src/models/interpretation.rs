use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quality classification the interpretation stage attaches to items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Strong,
    Good,
    Adequate,
    Weak,
    Missed,
    /// Anything the model returned that we don't recognise
    #[default]
    #[serde(other)]
    Unknown,
}

impl Quality {
    /// Weak and missed items are the ones worth rehearsing
    pub fn needs_practice(self) -> bool {
        matches!(self, Quality::Weak | Quality::Missed)
    }
}

/// Score and short note for one rubric category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: u32,
    #[serde(default)]
    pub note: String,
}

/// Coverage of one SPIN phase (situation, problem, implication, need-payoff)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinPhaseDetail {
    /// Number of questions the rep asked in this phase
    #[serde(default)]
    pub count: u32,
    /// Verbatim quotes from the call
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub quality: Quality,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub question: String,
    /// SPIN phase label, when the model assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_phase: Option<String>,
    #[serde(default)]
    pub quality: Quality,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionItem {
    /// What the prospect objected to
    pub objection: String,
    /// What the rep said in reply (may be empty when the objection was missed)
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub quality: Quality,
}

/// Structured judgement of a call, produced by the LLM stage
///
/// The pipeline treats this as already validated input. Every field defaults
/// so partial responses still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interpretation {
    /// Overall score 0-100
    pub score: u32,
    pub category_scores: BTreeMap<String, CategoryScore>,
    /// Most important first
    pub strengths: Vec<String>,
    /// Most important first
    pub weaknesses: Vec<String>,
    pub filler_words_analysis: String,
    pub talk_ratio_analysis: String,
    pub spin_coverage: BTreeMap<String, SpinPhaseDetail>,
    pub questions_asked: Vec<QuestionItem>,
    pub objections_handled: Vec<ObjectionItem>,
}

/// Short call summary produced alongside the LLM coaching narrative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSummary {
    pub overview: String,
    pub key_moments: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prospect_sentiment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interpretation_json() {
        let json = r#"{
            "score": 72,
            "categoryScores": {
                "discovery": {"score": 80, "note": "Good open questions"}
            },
            "strengths": ["Clear opening"],
            "weaknesses": ["Rushed the close"],
            "spinCoverage": {
                "problem": {"count": 2, "examples": ["What slows you down?"], "quality": "good"}
            },
            "questionsAsked": [
                {"question": "How do you handle it today?", "spinPhase": "situation", "quality": "strong"}
            ],
            "objectionsHandled": [
                {"objection": "Too expensive", "response": "It's worth it", "quality": "weak"},
                {"objection": "No time", "quality": "missed"}
            ]
        }"#;

        let interpretation: Interpretation = serde_json::from_str(json).unwrap();

        assert_eq!(interpretation.score, 72);
        assert_eq!(interpretation.category_scores["discovery"].score, 80);
        assert_eq!(interpretation.spin_coverage["problem"].quality, Quality::Good);
        assert_eq!(interpretation.objections_handled.len(), 2);
        assert_eq!(interpretation.objections_handled[1].response, "");
        assert_eq!(interpretation.objections_handled[1].quality, Quality::Missed);
        assert!(interpretation.filler_words_analysis.is_empty());
    }

    #[test]
    fn test_unknown_quality_is_tolerated() {
        let item: ObjectionItem =
            serde_json::from_str(r#"{"objection": "x", "response": "y", "quality": "brilliant"}"#)
                .unwrap();
        assert_eq!(item.quality, Quality::Unknown);
        assert!(!item.quality.needs_practice());
    }

    #[test]
    fn test_needs_practice() {
        assert!(Quality::Weak.needs_practice());
        assert!(Quality::Missed.needs_practice());
        assert!(!Quality::Strong.needs_practice());
    }
}
