//! Predicted consequence lookup

use log::warn;

use super::ToolOutput;
use crate::sources::VariantSource;

pub const NOT_FOUND: &str = "No consequence data found. Please check your variant ID";
const ERROR_PREFIX: &str = "Error in extracting consequence data. Please check your variant ID";

pub async fn get_consequence_info(source: &dyn VariantSource, variant_id: &str) -> ToolOutput {
    let record = match source.fetch(variant_id).await {
        Ok(record) => record,
        Err(e) => {
            warn!("get_consequence_info({}) failed: {}", variant_id, e);
            return ToolOutput::failed(format!("{}: {}", ERROR_PREFIX, e));
        }
    };

    let terms = record.consequences();
    if terms.is_empty() {
        return ToolOutput::not_found(NOT_FOUND);
    }

    ToolOutput::found(format!(
        "Predicted {} genetic consequences are {}",
        variant_id,
        terms.join(", ")
    ))
}
