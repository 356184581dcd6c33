use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{FullAnalysisResult, NarrativeSource};

/// Write the full analysis result as pretty JSON
pub fn write_result_json(result: &FullAnalysisResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, result).context("Failed to write JSON")?;
    Ok(())
}

/// Plain-text coaching report for the rep
pub struct HumanReport<'a> {
    result: &'a FullAnalysisResult,
}

impl<'a> HumanReport<'a> {
    pub fn new(result: &'a FullAnalysisResult) -> Self {
        Self { result }
    }

    /// Format the report as human-readable text
    pub fn format(&self) -> String {
        let result = self.result;
        let metrics = &result.metrics;
        let coaching = &result.coaching;
        let mut output = String::new();

        output.push_str("Call Coaching Report\n");
        output.push_str("====================\n");
        output.push_str(&format!("Score: {}/100\n", result.interpretation.score));
        output.push_str(&format!(
            "Rep: {} ({} turns, {} speakers)\n",
            display_speaker(&result.parsed_transcript.me_speaker),
            result.parsed_transcript.turn_count,
            result.parsed_transcript.speakers.len()
        ));
        output.push_str(&format!(
            "Talk ratio: {}% rep / {}% prospect\n",
            metrics.talk_ratio_me, metrics.talk_ratio_prospect
        ));
        output.push_str(&format!("Filler-word rate: {}%", metrics.filler_word_rate));
        if !metrics.filler_words.is_empty() {
            let top: Vec<String> = metrics
                .filler_words
                .top(5)
                .into_iter()
                .map(|(term, count)| format!("{} {}x", term, count))
                .collect();
            output.push_str(&format!(" ({})", top.join(", ")));
        }
        output.push_str("\n\n");

        if let Some(summary) = &result.summary {
            output.push_str("Summary\n-------\n");
            output.push_str(&wrap_text(&summary.overview, 80));
            output.push('\n');
            for step in &summary.next_steps {
                output.push_str(&format!("- Next: {}\n", step));
            }
            output.push('\n');
        }

        output.push_str("Coaching\n--------\n");
        output.push_str(&wrap_text(&coaching.narrative, 80));
        output.push_str("\n\n");

        if !coaching.actions.is_empty() {
            output.push_str("Actions\n-------\n");
            for (i, action) in coaching.actions.iter().enumerate() {
                output.push_str(&format!(
                    "{}. [{}] {}\n",
                    i + 1,
                    action.priority.as_str(),
                    action.title
                ));
                output.push_str(&indent(&wrap_text(&action.description, 76), "   "));
                output.push('\n');
            }
            output.push('\n');
        }

        if !coaching.practice_scenarios.is_empty() {
            output.push_str("Practice\n--------\n");
            for scenario in &coaching.practice_scenarios {
                output.push_str(&format!("* {}\n", scenario.situation));
                output.push_str(&indent(&wrap_text(&scenario.better_approach, 76), "  "));
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str(&coaching.motivational_close);
        output.push('\n');

        if result.metadata.narrative_source == NarrativeSource::Fallback {
            output.push_str("\n(coaching generated locally)\n");
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn display_speaker(label: &str) -> &str {
    if label.is_empty() { "(unknown)" } else { label }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}
