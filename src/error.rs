//! Error types for VariantAI
//!
//! Centralized error handling using thiserror. Tool-level failures never show
//! up here: executors turn them into text for the model instead.

use thiserror::Error;

/// All error types that can occur in VariantAI
#[derive(Debug, Error)]
pub enum VariantAiError {
    /// Tool registry failed startup validation
    #[error("Registry error: {0}")]
    Registry(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector store / embedding error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Tool call arguments did not satisfy the declared parameters
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Prompt template rendering error
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Chat history import/export error
    #[error("Session error: {0}")]
    Session(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for VariantAI operations
pub type Result<T> = std::result::Result<T, VariantAiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error() {
        let err = VariantAiError::Registry("duplicate tool name: get_gene_name".to_string());
        assert_eq!(err.to_string(), "Registry error: duplicate tool name: get_gene_name");
    }

    #[test]
    fn test_llm_error() {
        let err = VariantAiError::Llm("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM error: rate limited");
    }

    #[test]
    fn test_invalid_arguments_error() {
        let err = VariantAiError::InvalidArguments {
            tool: "get_clinical_info".to_string(),
            reason: "missing required parameter 'variant_id'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid arguments for get_clinical_info: missing required parameter 'variant_id'"
        );
    }

    #[test]
    fn test_prompt_error() {
        let err = VariantAiError::Prompt("Failed to render template: unclosed block".to_string());
        assert_eq!(err.to_string(), "Prompt error: Failed to render template: unclosed block");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VariantAiError = io_err.into();
        assert!(matches!(err, VariantAiError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: VariantAiError = json_err.into();
        assert!(matches!(err, VariantAiError::Json(_)));
    }
}
