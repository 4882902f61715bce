//! Tool parser for extracting tool calls from chat completion responses
//!
//! OpenAI-compatible endpoints return `choices[0].message` with an optional
//! `content` string and an optional `tool_calls` array whose `arguments` are a
//! JSON document encoded as a string.

use log::warn;
use serde_json::Value;

use crate::error::{Result, VariantAiError};
use crate::llm::types::{CompletionResponse, FinishReason, ToolCall, Usage};

/// Parse a raw chat completion body into a CompletionResponse
pub fn parse_response(response: &Value) -> Result<CompletionResponse> {
    let choice = response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| VariantAiError::Llm("response has no choices".to_string()))?;

    let message = choice.get("message").unwrap_or(&Value::Null);

    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .map(String::from);

    let tool_calls = message
        .get("tool_calls")
        .and_then(|t| t.as_array())
        .map(|calls| {
            calls
                .iter()
                .filter_map(|call| match parse_tool_call(call) {
                    Ok(parsed) => Some(parsed),
                    Err(reason) => {
                        warn!("Dropping tool call entry ({}): {}", reason, call);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|s| s.as_str())
        .map(FinishReason::parse)
        .unwrap_or_default();

    let usage = response.get("usage").map(parse_usage).unwrap_or_default();

    Ok(CompletionResponse {
        content,
        tool_calls,
        finish_reason,
        usage,
    })
}

/// Parse a single tool_calls entry; the error names what is missing
fn parse_tool_call(call: &Value) -> std::result::Result<ToolCall, &'static str> {
    let id = call.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
    let function = call.get("function").ok_or("missing function")?;
    let name = function
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or("missing function name")?;

    Ok(match function.get("arguments") {
        Some(Value::String(raw)) => ToolCall::from_raw(id, name, raw),
        Some(other) => ToolCall::new(id, name, other.clone()),
        None => ToolCall::new(id, name, Value::Object(Default::default())),
    })
}

/// Decode a JSON-string argument payload, keeping undecodable text verbatim
pub fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_usage(usage: &Value) -> Usage {
    Usage {
        prompt_tokens: usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        completion_tokens: usage.get("completion_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
    }
}
