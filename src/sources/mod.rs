//! External data sources behind the variant lookup tools
//!
//! Each source does one fetch and hands back a minimally-typed record. Missing
//! fields deserialize to empty collections so extraction never fails on shape.

mod mock;
mod myvariant;
mod scholar;

pub use mock::{StaticLiteratureSource, StaticVariantSource};
pub use myvariant::{DEFAULT_MYVARIANT_URL, MyVariantClient};
pub use scholar::{DEFAULT_SERPAPI_URL, ScholarClient};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors raised by a data source fetch
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("{0} not set")]
    MissingApiKey(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

/// Variant annotation lookup (myvariant.info style)
#[async_trait]
pub trait VariantSource: Send + Sync {
    async fn fetch(&self, variant_id: &str) -> Result<VariantRecord, SourceError>;
}

/// Ranked literature search
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SourceError>;
}

/// The parts of a variant annotation document the tools read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariantRecord {
    pub clinvar: ClinvarAnnotation,
    pub cadd: CaddAnnotation,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClinvarAnnotation {
    #[serde(deserialize_with = "one_or_many")]
    pub rcv: Vec<ClinvarReport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClinvarReport {
    pub clinical_significance: Option<String>,
}

/// Predicted-effect annotation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaddAnnotation {
    #[serde(deserialize_with = "one_or_many")]
    pub consequence: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub gene: Vec<GeneAnnotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneAnnotation {
    pub genename: Option<String>,
}

impl VariantRecord {
    /// Significance terms across every linked report, in source order
    pub fn clinical_significances(&self) -> Vec<&str> {
        self.clinvar
            .rcv
            .iter()
            .filter_map(|report| report.clinical_significance.as_deref())
            .filter(|term| !term.is_empty())
            .collect()
    }

    /// Gene names from the entries that declare one
    pub fn gene_names(&self) -> Vec<&str> {
        self.cadd.gene.iter().filter_map(|gene| gene.genename.as_deref()).collect()
    }

    /// Predicted consequence terms, verbatim
    pub fn consequences(&self) -> &[String] {
        &self.cadd.consequence
    }
}

/// One ranked search result; citation-only entries carry no link
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub link: Option<String>,
}

impl SearchHit {
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
        }
    }
}

/// The annotation service returns a bare object when there is a single entry
/// and a list otherwise; null is treated as empty.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
