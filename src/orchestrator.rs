//! Orchestrator - the grounded, tool-augmented answer cycle
//!
//! One question runs through: retrieve context, build the grounded prompt,
//! first model call with the tool declarations attached, then either take the
//! response as the answer or execute the requested tools in order and make a
//! single follow-up call carrying every tool result.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::error::Result;
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, ToolResult, Usage};
use crate::prompt::{PromptRenderer, SYSTEM_PROMPT, grounding_block};
use crate::retrieval::{DEFAULT_TOP_K, Retriever};
use crate::session::ChatSession;
use crate::tools::ToolExecutor;

/// Answer text used when the model returns no content
pub const EMPTY_ANSWER: &str = "I'm sorry, I could not produce an answer to that question.";

/// Answer text used when the language model cannot be reached
pub const UNAVAILABLE_ANSWER: &str = "I'm sorry, the language model is unavailable right now. Please try again.";

/// How an answer was produced
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPath {
    /// The first response was final
    Direct,
    /// Tools ran between the first and second model calls
    ToolAssisted { results: Vec<ToolResult> },
    /// The cycle could not reach the model
    Unavailable { reason: String },
}

/// Final text for one question plus how it came about
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub path: AnswerPath,
    pub usage: Usage,
}

impl Answer {
    pub fn tool_results(&self) -> &[ToolResult] {
        match &self.path {
            AnswerPath::ToolAssisted { results } => results,
            _ => &[],
        }
    }
}

pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    tools: ToolExecutor,
    prompts: PromptRenderer,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, retriever: Arc<dyn Retriever>, tools: ToolExecutor) -> Self {
        Self {
            llm,
            retriever,
            tools,
            prompts: PromptRenderer::new(),
        }
    }

    /// Run one question through the cycle. Tool failures never surface here;
    /// only prompt rendering or a model call can fail it.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let context = self.ground(question).await;
        let prompt = self.prompts.grounded_prompt(&context, question)?;
        let mut messages = vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)];

        info!("First model call ({} tools attached)", self.tools.registry().len());
        let first = self
            .llm
            .complete(CompletionRequest::new(messages.clone()).with_tools(self.tools.registry().definitions()))
            .await?;
        let mut usage = first.usage;

        if !first.requests_tools() {
            info!("Direct answer");
            return Ok(Answer {
                text: answer_text(&first),
                path: AnswerPath::Direct,
                usage,
            });
        }

        let names: Vec<&str> = first.tool_calls.iter().map(|c| c.name.as_str()).collect();
        info!("Tool dispatch: {:?}", names);
        let results = self.tools.execute_all(&first.tool_calls).await;

        messages.push(first.to_message());
        for result in &results {
            messages.push(Message::tool(&result.tool_call_id, &result.content));
        }

        info!("Second model call with {} tool results", results.len());
        let second = self.llm.complete(CompletionRequest::new(messages)).await?;
        usage.add(&second.usage);

        Ok(Answer {
            text: answer_text(&second),
            path: AnswerPath::ToolAssisted { results },
            usage,
        })
    }

    /// Answer inside a session: records the question and exactly one reply
    ///
    /// A model failure is rendered as an apology turn instead of an error.
    pub async fn ask(&self, session: &mut ChatSession, question: &str) -> Answer {
        session.push_user(question);

        let answer = match self.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Answer cycle failed: {}", e);
                Answer {
                    text: UNAVAILABLE_ANSWER.to_string(),
                    path: AnswerPath::Unavailable { reason: e.to_string() },
                    usage: Usage::default(),
                }
            }
        };

        session.push_assistant(&answer.text);
        session.add_usage(&answer.usage);
        answer
    }

    /// Retrieve and join passages; a store failure grounds on nothing
    async fn ground(&self, question: &str) -> String {
        match self.retriever.retrieve(question, DEFAULT_TOP_K).await {
            Ok(passages) => {
                debug!("Retrieved {} passages", passages.len());
                grounding_block(&passages)
            }
            Err(e) => {
                warn!("Retrieval failed, continuing without context: {}", e);
                String::new()
            }
        }
    }
}

fn answer_text(response: &CompletionResponse) -> String {
    match response.content.as_deref() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => EMPTY_ANSWER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, Role, ToolCall};
    use crate::retrieval::StaticRetriever;
    use crate::sources::{StaticLiteratureSource, StaticVariantSource};
    use crate::tools::ToolRegistry;
    use serde_json::json;

    fn executor(variants: StaticVariantSource) -> ToolExecutor {
        ToolExecutor::new(
            ToolRegistry::standard().unwrap(),
            Arc::new(variants),
            Arc::new(StaticLiteratureSource::new(Vec::new())),
        )
    }

    fn orchestrator(llm: Arc<MockLlmClient>, variants: StaticVariantSource) -> Orchestrator {
        Orchestrator::new(
            llm,
            Arc::new(StaticRetriever::new(vec!["passage one".into(), "passage two".into()])),
            executor(variants),
        )
    }

    #[tokio::test]
    async fn test_direct_answer_single_call() {
        let llm = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("BRCA1 is a gene.")]));
        let orch = orchestrator(llm.clone(), StaticVariantSource::from_json(json!({})).unwrap());

        let answer = orch.answer("What is BRCA1?").await.unwrap();
        assert_eq!(answer.text, "BRCA1 is a gene.");
        assert_eq!(answer.path, AnswerPath::Direct);
        assert_eq!(llm.call_count(), 1);

        let request = &llm.requests()[0];
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content.as_deref(), Some(SYSTEM_PROMPT));
        let prompt = request.messages[1].content.as_deref().unwrap();
        assert!(prompt.contains("Context:\npassage one\n\npassage two\n"));
        assert!(prompt.contains("Question:\nWhat is BRCA1?\n"));
        assert_eq!(request.tools.len(), 4);
    }

    #[tokio::test]
    async fn test_tool_assisted_history() {
        let call = ToolCall::new("call_1", "get_gene_name", json!({"variant_id": "chr1:g.11856378G>A"}));
        let llm = Arc::new(MockLlmClient::new(vec![
            CompletionResponse::with_tool_calls(vec![call]),
            CompletionResponse::text("It lies in MTHFR."),
        ]));
        let variants = StaticVariantSource::from_json(json!({"cadd": {"gene": [{"genename": "MTHFR"}]}})).unwrap();
        let orch = orchestrator(llm.clone(), variants);

        let answer = orch.answer("Which gene?").await.unwrap();
        assert_eq!(answer.text, "It lies in MTHFR.");
        assert_eq!(answer.tool_results().len(), 1);

        let follow_up = &llm.requests()[1];
        assert!(follow_up.tools.is_empty());
        let roles: Vec<Role> = follow_up.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
        assert_eq!(follow_up.messages[2].tool_calls[0].id, "call_1");
        assert_eq!(follow_up.messages[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(
            follow_up.messages[3].content.as_deref(),
            Some("chr1:g.11856378G>A is located and associated with: MTHFR")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_still_answers() {
        let call = ToolCall::new("call_x", "get_weather", json!({}));
        let llm = Arc::new(MockLlmClient::new(vec![
            CompletionResponse::with_tool_calls(vec![call]),
            CompletionResponse::text("I cannot check the weather."),
        ]));
        let orch = orchestrator(llm.clone(), StaticVariantSource::from_json(json!({})).unwrap());

        let mut session = ChatSession::new();
        let answer = orch.ask(&mut session, "Weather?").await;

        assert_eq!(answer.tool_results()[0].content, "Unknown tool");
        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[1].content, "I cannot check the weather.");
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_retrieval_failure_grounds_on_nothing() {
        let llm = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("I don't know.")]));
        let orch = Orchestrator::new(
            llm.clone(),
            Arc::new(StaticRetriever::failing("store offline")),
            executor(StaticVariantSource::from_json(json!({})).unwrap()),
        );

        let answer = orch.answer("Q?").await.unwrap();
        assert_eq!(answer.text, "I don't know.");
        let prompt = llm.requests()[0].messages[1].content.clone().unwrap();
        assert!(prompt.contains("Context:\n\n\nQuestion:\nQ?"));
    }

    #[tokio::test]
    async fn test_model_failure_becomes_apology_turn() {
        let llm = Arc::new(MockLlmClient::new(Vec::new()));
        let orch = orchestrator(llm, StaticVariantSource::from_json(json!({})).unwrap());

        let mut session = ChatSession::new();
        let answer = orch.ask(&mut session, "Anything").await;

        assert_eq!(answer.text, UNAVAILABLE_ANSWER);
        assert!(matches!(answer.path, AnswerPath::Unavailable { .. }));
        assert_eq!(session.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_content_falls_back() {
        let llm = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("   ")]));
        let orch = orchestrator(llm, StaticVariantSource::from_json(json!({})).unwrap());
        assert_eq!(orch.answer("Q").await.unwrap().text, EMPTY_ANSWER);
    }

    #[tokio::test]
    async fn test_grounds_on_top_three_passages() {
        let llm = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("ok")]));
        let retriever = Arc::new(StaticRetriever::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]));
        let orch = Orchestrator::new(
            llm.clone(),
            retriever.clone(),
            executor(StaticVariantSource::from_json(json!({})).unwrap()),
        );

        orch.answer("Q").await.unwrap();
        let prompt = llm.requests()[0].messages[1].content.clone().unwrap();
        assert!(prompt.contains("Context:\na\n\nb\n\nc\n\nQuestion:"));
        assert_eq!(retriever.queries(), vec!["Q".to_string()]);
    }
}
