//! In-memory sources for tests and offline runs

use std::sync::Mutex;

use async_trait::async_trait;

use super::{LiteratureSource, SearchHit, SourceError, VariantRecord, VariantSource};

/// Returns the same record (or failure) for every variant id
pub struct StaticVariantSource {
    record: Result<VariantRecord, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticVariantSource {
    pub fn new(record: VariantRecord) -> Self {
        Self {
            record: Ok(record),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Build from a raw annotation document
    pub fn from_json(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_value(document)?))
    }

    /// Every fetch fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            record: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Variant ids fetched so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl VariantSource for StaticVariantSource {
    async fn fetch(&self, variant_id: &str) -> Result<VariantRecord, SourceError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(variant_id.to_string());
        self.record.clone().map_err(SourceError::Other)
    }
}

/// Returns a fixed ranked hit list (or failure) for every query
pub struct StaticLiteratureSource {
    hits: Result<Vec<SearchHit>, String>,
    queries: Mutex<Vec<String>>,
}

impl StaticLiteratureSource {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: Ok(hits),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            hits: Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LiteratureSource for StaticLiteratureSource {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SourceError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        self.hits.clone().map_err(SourceError::Other)
    }
}
