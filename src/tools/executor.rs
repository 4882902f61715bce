//! Tool executor - resolves model tool calls and runs them

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use super::{
    ToolKind, ToolOutput, ToolRegistry, get_clinical_info, get_consequence_info, get_gene_name, show_literature,
};
use crate::error::{Result, VariantAiError};
use crate::llm::{ToolCall, ToolResult};
use crate::sources::{LiteratureSource, VariantSource};

/// Result text for a call naming an undeclared tool
pub const UNKNOWN_TOOL: &str = "Unknown tool";

/// Runs tool calls against the registry and the data sources
pub struct ToolExecutor {
    registry: ToolRegistry,
    variants: Arc<dyn VariantSource>,
    literature: Arc<dyn LiteratureSource>,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, variants: Arc<dyn VariantSource>, literature: Arc<dyn LiteratureSource>) -> Self {
        Self {
            registry,
            variants,
            literature,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool call. Never fails: every outcome becomes result text.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(declaration) = self.registry.get(&call.name) else {
            warn!("Model requested unknown tool: {}", call.name);
            return ToolResult::error(&call.id, UNKNOWN_TOOL);
        };

        if let Err(e) = declaration.validate_arguments(&call.arguments) {
            warn!("Rejected call {} to {}: {}", call.id, call.name, e);
            return ToolResult::error(&call.id, e.to_string());
        }

        let output = match self.dispatch(declaration.kind, &call.arguments).await {
            Ok(output) => output,
            Err(e) => ToolOutput::failed(e.to_string()),
        };

        info!("Tool {} ({}) -> {:?}", call.name, call.id, output.kind);
        debug!("Tool {} result: {}", call.name, output.content);

        if output.is_error() {
            ToolResult::error(&call.id, output.content)
        } else {
            ToolResult::success(&call.id, output.content)
        }
    }

    /// Execute calls one after another, keeping the model's order
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await);
        }
        results
    }

    async fn dispatch(&self, kind: ToolKind, arguments: &Value) -> Result<ToolOutput> {
        let output = match kind {
            ToolKind::ConsequenceInfo => {
                get_consequence_info(self.variants.as_ref(), string_arg(kind, arguments, "variant_id")?).await
            }
            ToolKind::GeneName => get_gene_name(self.variants.as_ref(), string_arg(kind, arguments, "variant_id")?).await,
            ToolKind::Literature => show_literature(self.literature.as_ref(), string_arg(kind, arguments, "query")?).await,
            ToolKind::ClinicalInfo => {
                get_clinical_info(self.variants.as_ref(), string_arg(kind, arguments, "variant_id")?).await
            }
        };
        Ok(output)
    }
}

fn string_arg<'a>(kind: ToolKind, arguments: &'a Value, name: &str) -> Result<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| VariantAiError::InvalidArguments {
            tool: kind.name().to_string(),
            reason: format!("missing required parameter '{}'", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{SearchHit, StaticLiteratureSource, StaticVariantSource};
    use serde_json::json;

    fn executor_with(variants: StaticVariantSource, literature: StaticLiteratureSource) -> ToolExecutor {
        ToolExecutor::new(ToolRegistry::standard().unwrap(), Arc::new(variants), Arc::new(literature))
    }

    fn benign_source() -> StaticVariantSource {
        StaticVariantSource::from_json(json!({
            "clinvar": { "rcv": [{ "clinical_significance": "Benign" }] },
            "cadd": { "gene": [{ "genename": "FANCC" }], "consequence": ["INTRONIC"] }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_execute_clinical() {
        let executor = executor_with(benign_source(), StaticLiteratureSource::new(Vec::new()));
        let call = ToolCall::new("call_1", "get_clinical_info", json!({"variant_id": "chr9:g.107620835G>A"}));

        let result = executor.execute(&call).await;
        assert_eq!(result.tool_call_id, "call_1");
        assert!(!result.is_error);
        assert!(result.content.contains("Benign"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = executor_with(benign_source(), StaticLiteratureSource::new(Vec::new()));
        let call = ToolCall::new("call_9", "get_weather", json!({"city": "Boston"}));

        let result = executor.execute(&call).await;
        assert_eq!(result.content, "Unknown tool");
        assert_eq!(result.tool_call_id, "call_9");
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_execute_invalid_arguments_skips_source() {
        let variants = Arc::new(benign_source());
        let executor = ToolExecutor::new(
            ToolRegistry::standard().unwrap(),
            variants.clone(),
            Arc::new(StaticLiteratureSource::new(Vec::new())),
        );

        let call = ToolCall::new("call_2", "get_gene_name", Value::String("{not json".to_string()));
        let result = executor.execute(&call).await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Invalid arguments for get_gene_name"));
        assert!(variants.requests().is_empty());
    }

    #[tokio::test]
    async fn test_execute_not_found_is_not_error() {
        let executor = executor_with(
            StaticVariantSource::from_json(json!({})).unwrap(),
            StaticLiteratureSource::new(Vec::new()),
        );
        let call = ToolCall::new("call_3", "get_consequence_info", json!({"variant_id": "chrX:g.1A>T"}));

        let result = executor.execute(&call).await;
        assert!(!result.is_error);
        assert_eq!(result.content, "No consequence data found. Please check your variant ID");
    }

    #[tokio::test]
    async fn test_execute_all_preserves_order() {
        let executor = executor_with(
            benign_source(),
            StaticLiteratureSource::new(vec![SearchHit::with_link("http://paper1.com")]),
        );
        let calls = vec![
            ToolCall::new("a", "show_literature", json!({"query": "FANCC"})),
            ToolCall::new("b", "get_gene_name", json!({"variant_id": "chr9:g.107620835G>A"})),
            ToolCall::new("c", "nope", json!({})),
        ];

        let results = executor.execute_all(&calls).await;
        let ids: Vec<&str> = results.iter().map(|r| r.tool_call_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(results[0].content, "http://paper1.com");
        assert_eq!(results[1].content, "chr9:g.107620835G>A is located and associated with: FANCC");
        assert_eq!(results[2].content, UNKNOWN_TOOL);
    }

    #[tokio::test]
    async fn test_execute_source_failure_is_error_result() {
        let executor = executor_with(
            StaticVariantSource::failing("API error"),
            StaticLiteratureSource::new(Vec::new()),
        );
        let call = ToolCall::new("call_4", "get_clinical_info", json!({"variant_id": "chr9:g.107620835G>A"}));

        let result = executor.execute(&call).await;
        assert!(result.is_error);
        assert!(result.content.ends_with("API error"));
    }
}
