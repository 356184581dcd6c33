use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{HumanReport, write_result_json};
use crate::models::FullAnalysisResult;

/// Configuration for Stage 4 rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to generate the JSON result
    pub generate_machine: bool,
    /// Whether to generate the text report
    pub generate_human: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            generate_machine: true,
            generate_human: true,
        }
    }
}

/// Paths actually written by Stage 4
#[derive(Debug, Default)]
pub struct RenderResult {
    pub machine_path: Option<PathBuf>,
    pub human_path: Option<PathBuf>,
}

/// Execute Stage 4: Rendering
///
/// Produces two output views:
/// 1. Machine output: the full analysis result as JSON
/// 2. Human output: a plain-text coaching report
pub fn execute_render(
    result: &FullAnalysisResult,
    machine_output: Option<&Path>,
    human_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let mut rendered = RenderResult::default();

    if config.generate_machine {
        if let Some(path) = machine_output {
            info!("Writing analysis result to {:?}", path);
            write_result_json(result, path)?;
            rendered.machine_path = Some(path.to_path_buf());
        }
    }

    if config.generate_human {
        if let Some(path) = human_output {
            info!("Writing coaching report to {:?}", path);
            HumanReport::new(result).write_file(path)?;
            rendered.human_path = Some(path.to_path_buf());
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interpretation;
    use crate::stages::{AnalysisConfig, analyze_offline};

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert!(config.generate_machine);
        assert!(config.generate_human);
    }

    #[test]
    fn test_render_respects_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_offline("Rep: hi\nClient: hello", Interpretation::default(), &AnalysisConfig::default());
        let json = dir.path().join("out.json");
        let text = dir.path().join("out.txt");

        let config = RenderConfig {
            generate_human: false,
            ..Default::default()
        };
        let rendered = execute_render(&result, Some(&json), Some(&text), &config).unwrap();

        assert_eq!(rendered.machine_path.as_deref(), Some(json.as_path()));
        assert!(rendered.human_path.is_none());
        assert!(json.exists());
        assert!(!text.exists());
    }
}
