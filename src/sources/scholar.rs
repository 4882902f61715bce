//! Google Scholar search through SerpApi

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::{LiteratureSource, SearchHit, SourceError};

/// SerpApi search endpoint
pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search";

/// Results requested per query
const RESULTS_PER_QUERY: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScholarResponse {
    organic_results: Vec<SearchHit>,
    error: Option<String>,
}

/// Literature search against the google_scholar engine
pub struct ScholarClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl ScholarClient {
    /// Build a client; a missing key only fails at search time
    pub fn from_env(base_url: &str, api_key_env: &str, timeout: Duration) -> Result<Self, SourceError> {
        let api_key = std::env::var(api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            debug!("ScholarClient: {} not set, literature search disabled", api_key_env);
        }
        Self::with_api_key(base_url, api_key, api_key_env, timeout)
    }

    pub fn with_api_key(
        base_url: &str,
        api_key: Option<String>,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
            api_key_env: api_key_env.to_string(),
        })
    }
}

#[async_trait]
impl LiteratureSource for ScholarClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::MissingApiKey(self.api_key_env.clone()))?;

        debug!("Scholar search: {}", query);
        let num = RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google_scholar"),
                ("q", query),
                ("api_key", api_key),
                ("num", num.as_str()),
                ("hl", "en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_results(&body)
    }
}

/// Decode a SerpApi body; an `error` field without results is a failure
fn parse_results(body: &str) -> Result<Vec<SearchHit>, SourceError> {
    let parsed: ScholarResponse = serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    match parsed.error {
        Some(error) if parsed.organic_results.is_empty() => Err(SourceError::Other(error)),
        _ => Ok(parsed.organic_results),
    }
}
