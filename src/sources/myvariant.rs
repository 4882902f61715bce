//! myvariant.info client

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};

use super::{SourceError, VariantRecord, VariantSource};

/// Public myvariant.info API
pub const DEFAULT_MYVARIANT_URL: &str = "https://myvariant.info/v1";

/// Fields the tools read; keeps responses small
const FIELDS: &str = "clinvar.rcv.clinical_significance,cadd.consequence,cadd.gene";

/// Fetches variant annotation documents by HGVS id
pub struct MyVariantClient {
    client: Client,
    base_url: Url,
}

impl MyVariantClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `{base}/variant/{id}` with the id percent-encoded as a single path segment
    fn variant_url(&self, variant_id: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("variant")
            .push(variant_id);
        Ok(url)
    }
}

#[async_trait]
impl VariantSource for MyVariantClient {
    async fn fetch(&self, variant_id: &str) -> Result<VariantRecord, SourceError> {
        let url = self.variant_url(variant_id)?;
        debug!("GET {}", url);

        let response = self.client.get(url).query(&[("fields", FIELDS)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}
