//! Reference-text retrieval for grounding prompts

mod chroma;

pub use chroma::ChromaRetriever;

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, VariantAiError};

/// Passages retrieved per question
pub const DEFAULT_TOP_K: usize = 3;

/// Returns the `k` most relevant passages for a query, best first
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>>;
}

/// Fixed passage list, for tests and runs without a vector store
pub struct StaticRetriever {
    passages: std::result::Result<Vec<String>, String>,
    queries: Mutex<Vec<String>>,
}

impl StaticRetriever {
    pub fn new(passages: Vec<String>) -> Self {
        Self {
            passages: Ok(passages),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Always returns no passages
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Every retrieval fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            passages: Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());

        match &self.passages {
            Ok(passages) => Ok(passages.iter().take(k).cloned().collect()),
            Err(message) => Err(VariantAiError::Retrieval(message.clone())),
        }
    }
}
