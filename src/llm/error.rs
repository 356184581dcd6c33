use thiserror::Error;

/// Failures talking to the LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("ANTHROPIC_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("failed to send request to Anthropic API: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Anthropic API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("no tool_use block named {0} in response")]
    MissingToolUse(String),

    #[error("failed to parse {tool} tool input: {source}")]
    InvalidToolInput {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LlmError::Api {
            status: 529,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Anthropic API error: 529 - overloaded");

        let err = LlmError::MissingToolUse("submit_interpretation".to_string());
        assert!(err.to_string().contains("submit_interpretation"));
    }
}
