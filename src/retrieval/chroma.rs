//! Chroma vector store over its REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::OnceCell;

use super::Retriever;
use crate::error::{Result, VariantAiError};
use crate::llm::Embedder;

/// Queries an existing Chroma collection with embedded question text
pub struct ChromaRetriever {
    client: Client,
    base_url: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
    collection_id: OnceCell<String>,
}

impl ChromaRetriever {
    pub fn new(base_url: &str, collection: &str, embedder: Arc<dyn Embedder>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VariantAiError::Retrieval(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            embedder,
            collection_id: OnceCell::new(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/api/v1/collections/{}", self.base_url, self.collection)
    }

    fn query_url(&self, collection_id: &str) -> String {
        format!("{}/api/v1/collections/{}/query", self.base_url, collection_id)
    }

    /// Resolve the collection name to its id once per retriever
    async fn collection_id(&self) -> Result<&str> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let body = self.get_json(&self.collection_url()).await?;
                body["id"].as_str().map(str::to_string).ok_or_else(|| {
                    VariantAiError::Retrieval(format!("collection {} has no id", self.collection))
                })
            })
            .await?;
        Ok(id.as_str())
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VariantAiError::Retrieval(format!("Chroma request failed: {}", e)))?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(VariantAiError::Retrieval(format!("Chroma error {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| VariantAiError::Retrieval(format!("Failed to parse Chroma response: {}", e)))
}

/// Pull `documents[0]` out of a query response, skipping null entries
fn parse_documents(body: &Value) -> Vec<String> {
    body["documents"][0]
        .as_array()
        .map(|docs| docs.iter().filter_map(|d| d.as_str()).map(str::to_string).collect())
        .unwrap_or_default()
}

#[async_trait]
impl Retriever for ChromaRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let embedding = self.embedder.embed(query).await?;
        let collection_id = self.collection_id().await?;

        debug!("Chroma query: collection={} k={}", self.collection, k);
        let response = self
            .client
            .post(self.query_url(collection_id))
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": k,
                "include": ["documents"]
            }))
            .send()
            .await
            .map_err(|e| VariantAiError::Retrieval(format!("Chroma query failed: {}", e)))?;

        let body = read_json(response).await?;
        let mut passages = parse_documents(&body);
        passages.truncate(k);
        Ok(passages)
    }
}
