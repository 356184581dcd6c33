use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Interpretation, ParsedTranscript};
use crate::stages::build_parsed_transcript;

/// Read raw transcript text from a file
///
/// A UTF-8 byte-order mark is stripped and Windows line endings are handled
/// by the line-oriented parser.
pub fn read_transcript_file(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}

/// Read and parse a transcript file in one step
pub fn parse_transcript_file(path: &Path, me_speaker: Option<&str>) -> Result<ParsedTranscript> {
    let raw = read_transcript_file(path)?;
    Ok(build_parsed_transcript(&raw, me_speaker))
}

/// Parse an interpretation from JSON text
pub fn parse_interpretation_json(json: &str) -> Result<Interpretation> {
    serde_json::from_str(json).context("Failed to parse interpretation JSON")
}

/// Load a previously produced interpretation (e.g. from an earlier LLM run)
pub fn load_interpretation_file(path: &Path) -> Result<Interpretation> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_interpretation_json(&content)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_transcript_strips_bom_and_crlf_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}Rep: Hello\r\nClient: Hi\r\n".as_bytes())
            .unwrap();

        let parsed = parse_transcript_file(file.path(), None).unwrap();

        assert_eq!(parsed.turn_count, 2);
        assert_eq!(parsed.me_speaker, "Rep");
        assert_eq!(parsed.turns[1].text, "Hi");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_transcript_file(&dir.path().join("nope.txt"));
        assert!(result.unwrap_err().to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_load_interpretation_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"score": 81, "strengths": ["Good rapport"]}}"#).unwrap();

        let interpretation = load_interpretation_file(file.path()).unwrap();
        assert_eq!(interpretation.score, 81);
        assert_eq!(interpretation.strengths, vec!["Good rapport"]);
    }

    #[test]
    fn test_invalid_interpretation_json() {
        let err = parse_interpretation_json("{not json").unwrap_err();
        assert!(err.to_string().contains("interpretation JSON"));
    }
}
