//! Clinical significance lookup

use log::warn;

use super::ToolOutput;
use crate::sources::VariantSource;

pub const NOT_FOUND: &str = "No clinical significance found. Please check your variant ID";
const ERROR_PREFIX: &str = "Error in extracting clinical significance. Please check your variant ID";

/// Report every ClinVar significance term linked to `variant_id`
pub async fn get_clinical_info(source: &dyn VariantSource, variant_id: &str) -> ToolOutput {
    let record = match source.fetch(variant_id).await {
        Ok(record) => record,
        Err(e) => {
            warn!("get_clinical_info({}) failed: {}", variant_id, e);
            return ToolOutput::failed(format!("{}: {}", ERROR_PREFIX, e));
        }
    };

    let terms = record.clinical_significances();
    if terms.is_empty() {
        return ToolOutput::not_found(NOT_FOUND);
    }

    ToolOutput::found(format!(
        "Clinical significance results of the {}, reported and interpreted by studies: {}",
        variant_id,
        terms.join(", ")
    ))
}
