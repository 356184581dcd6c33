use crate::models::{AnalysisSummary, CoachingNarrative, Interpretation};

/// Configuration for LLM response validation
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Highest score the model may return
    pub max_score: u32,
    /// Reject interpretations with neither strengths nor weaknesses
    pub require_findings: bool,
    /// Maximum number of coaching actions accepted
    pub max_actions: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_score: 100,
            require_findings: true,
            max_actions: 8,
        }
    }
}

/// Validation result for a model response
#[derive(Debug, Clone)]
pub struct ResponseValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ResponseValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check an interpretation returned by the model
pub fn validate_interpretation(
    interpretation: &Interpretation,
    config: &ValidationConfig,
) -> ResponseValidation {
    let mut errors = Vec::new();

    // 1. Overall score in range
    if interpretation.score > config.max_score {
        errors.push(format!(
            "Score {} out of range (max {})",
            interpretation.score, config.max_score
        ));
    }

    // 2. Category scores in range
    for (category, entry) in &interpretation.category_scores {
        if entry.score > config.max_score {
            errors.push(format!(
                "Category {} score {} out of range (max {})",
                category, entry.score, config.max_score
            ));
        }
    }

    // 3. Something to coach on
    let has_findings = interpretation
        .strengths
        .iter()
        .chain(&interpretation.weaknesses)
        .any(|s| !s.trim().is_empty());
    if config.require_findings && !has_findings {
        errors.push("Interpretation has no strengths or weaknesses".to_string());
    }

    // 4. Objections must say what was objected to
    for (i, item) in interpretation.objections_handled.iter().enumerate() {
        if item.objection.trim().is_empty() {
            errors.push(format!("Objection {} has empty text", i));
        }
    }

    ResponseValidation::from_errors(errors)
}

/// Check a summary + narrative returned by the model
pub fn validate_coaching(
    summary: &AnalysisSummary,
    narrative: &CoachingNarrative,
    config: &ValidationConfig,
) -> ResponseValidation {
    let mut errors = Vec::new();

    if summary.overview.trim().is_empty() {
        errors.push("Summary overview is empty".to_string());
    }

    if narrative.narrative.trim().is_empty() {
        errors.push("Coaching narrative is empty".to_string());
    }

    if narrative.motivational_close.trim().is_empty() {
        errors.push("Motivational close is empty".to_string());
    }

    if narrative.actions.len() > config.max_actions {
        errors.push(format!(
            "Too many actions: {} > {} allowed",
            narrative.actions.len(),
            config.max_actions
        ));
    }

    for (i, action) in narrative.actions.iter().enumerate() {
        if action.title.trim().is_empty() || action.description.trim().is_empty() {
            errors.push(format!("Action {} has empty title or description", i));
        }
    }

    ResponseValidation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryScore, CoachingAction, ObjectionItem, Priority};

    fn valid_interpretation() -> Interpretation {
        Interpretation {
            score: 70,
            strengths: vec!["Clear agenda".to_string()],
            ..Default::default()
        }
    }

    fn valid_narrative() -> CoachingNarrative {
        CoachingNarrative {
            narrative: "Good call.".to_string(),
            actions: vec![CoachingAction::new("Ask", "Ask more", Priority::High)],
            practice_scenarios: vec![],
            motivational_close: "Keep going.".to_string(),
        }
    }

    fn valid_summary() -> AnalysisSummary {
        AnalysisSummary {
            overview: "Intro call".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_interpretation() {
        let result = validate_interpretation(&valid_interpretation(), &ValidationConfig::default());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_score_out_of_range() {
        let mut interpretation = valid_interpretation();
        interpretation.score = 140;
        interpretation.category_scores.insert(
            "closing".to_string(),
            CategoryScore {
                score: 101,
                note: String::new(),
            },
        );

        let result = validate_interpretation(&interpretation, &ValidationConfig::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[1].contains("closing"));
    }

    #[test]
    fn test_empty_findings_rejected_unless_disabled() {
        let interpretation = Interpretation {
            score: 50,
            weaknesses: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(!validate_interpretation(&interpretation, &ValidationConfig::default()).is_valid);

        let config = ValidationConfig {
            require_findings: false,
            ..Default::default()
        };
        assert!(validate_interpretation(&interpretation, &config).is_valid);
    }

    #[test]
    fn test_blank_objection_rejected() {
        let mut interpretation = valid_interpretation();
        interpretation.objections_handled.push(ObjectionItem::default());

        let result = validate_interpretation(&interpretation, &ValidationConfig::default());
        assert!(result.errors[0].contains("Objection 0"));
    }

    #[test]
    fn test_valid_coaching() {
        let result = validate_coaching(
            &valid_summary(),
            &valid_narrative(),
            &ValidationConfig::default(),
        );
        assert!(result.is_valid);
    }

    #[test]
    fn test_coaching_problems_reported() {
        let mut narrative = valid_narrative();
        narrative.narrative = String::new();
        narrative.actions = vec![CoachingAction::new("", "x", Priority::Low); 9];

        let result = validate_coaching(
            &AnalysisSummary::default(),
            &narrative,
            &ValidationConfig::default(),
        );
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("overview")));
        assert!(result.errors.iter().any(|e| e.contains("narrative is empty")));
        assert!(result.errors.iter().any(|e| e.contains("Too many actions")));
    }
}
