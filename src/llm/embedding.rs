//! Embeddings client for query vectors, calling an OpenAI-compatible `/embeddings` endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{Result, VariantAiError};

/// Default embedding model (the one the knowledge base was indexed with)
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Turns text into a vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// OpenAI-compatible embedder
pub struct OpenAiEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(base_url: &str, model: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VariantAiError::Retrieval(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|e| VariantAiError::Retrieval(format!("Embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VariantAiError::Retrieval(format!("Embedding API error {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VariantAiError::Retrieval(format!("Failed to parse embedding response: {}", e)))?;

        parse_embedding(&body)
    }
}

/// Extract `data[0].embedding` from an embeddings response
fn parse_embedding(body: &Value) -> Result<Vec<f32>> {
    body["data"][0]["embedding"]
        .as_array()
        .map(|values| values.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect())
        .ok_or_else(|| VariantAiError::Retrieval("embedding response has no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedding() {
        let body = json!({ "data": [{ "embedding": [0.25, -0.5, 1.0] }] });
        assert_eq!(parse_embedding(&body).unwrap(), vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn test_parse_embedding_missing_data() {
        let result = parse_embedding(&json!({ "data": [] }));
        assert!(matches!(result, Err(VariantAiError::Retrieval(_))));
    }

    #[test]
    fn test_base_url_trimmed() {
        let embedder = OpenAiEmbedder::new(
            "https://api.openai.com/v1/",
            DEFAULT_EMBEDDING_MODEL,
            "k".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(embedder.base_url, "https://api.openai.com/v1");
    }
}
