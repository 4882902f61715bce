//! Gene name lookup

use log::warn;

use super::ToolOutput;
use crate::sources::VariantSource;

pub const NOT_FOUND: &str = "No gene name found. Please check your variant ID";
const ERROR_PREFIX: &str = "Error in extracting gene name. Please check your variant ID";

/// Name the genes a variant falls in, skipping entries without a name
pub async fn get_gene_name(source: &dyn VariantSource, variant_id: &str) -> ToolOutput {
    let record = match source.fetch(variant_id).await {
        Ok(record) => record,
        Err(e) => {
            warn!("get_gene_name({}) failed: {}", variant_id, e);
            return ToolOutput::failed(format!("{}: {}", ERROR_PREFIX, e));
        }
    };

    let names = record.gene_names();
    if names.is_empty() {
        return ToolOutput::not_found(NOT_FOUND);
    }

    ToolOutput::found(format!("{} is located and associated with: {}", variant_id, names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StaticVariantSource;
    use crate::tools::OutputKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_gene_names_skip_entries_without_name() {
        let source = StaticVariantSource::from_json(json!({
            "cadd": { "gene": [
                { "genename": "MTHFR", "feature_id": "ENST00000376590" },
                { "feature_id": "ENSR00000279227" },
                { "genename": "C1orf167" }
            ]}
        }))
        .unwrap();

        let output = get_gene_name(&source, "chr1:g.11856378G>A").await;
        assert_eq!(output.kind, OutputKind::Found);
        assert_eq!(output.content, "chr1:g.11856378G>A is located and associated with: MTHFR, C1orf167");
    }

    #[tokio::test]
    async fn test_no_gene_names() {
        let source = StaticVariantSource::from_json(json!({ "cadd": { "gene": [{ "feature_id": "x" }] } })).unwrap();
        let output = get_gene_name(&source, "chr1:g.11856378G>A").await;
        assert_eq!(output.content, NOT_FOUND);
        assert_eq!(output.kind, OutputKind::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let source = StaticVariantSource::failing("API error");
        let output = get_gene_name(&source, "chr1:g.11856378G>A").await;
        assert!(output.is_error());
        assert_eq!(
            output.content,
            "Error in extracting gene name. Please check your variant ID: API error"
        );
    }
}
