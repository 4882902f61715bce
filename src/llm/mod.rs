//! LLM Client Layer - OpenAI-compatible chat completions with tool calling
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation and a scripted MockLlmClient
//! - Tool call parsing
//! - Query embeddings for retrieval

pub mod client;
pub mod embedding;
pub mod openai;
pub mod tool_parser;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use embedding::{Embedder, OpenAiEmbedder};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use tool_parser::{parse_arguments, parse_response};
pub use types::{
    CompletionRequest, CompletionResponse, FinishReason, Message, Role, ToolCall, ToolDefinition, ToolResult, Usage,
};
