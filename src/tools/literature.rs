//! Literature search

use log::warn;

use super::ToolOutput;
use crate::sources::LiteratureSource;

pub const NO_LINKS: &str = "No links found.";
const ERROR_PREFIX: &str = "Error in show_literature";

/// Ranked results considered per search
const MAX_LINKS: usize = 5;

/// Return links of the top-ranked publications, one per line
pub async fn show_literature(source: &dyn LiteratureSource, query: &str) -> ToolOutput {
    let hits = match source.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("show_literature({}) failed: {}", query, e);
            return ToolOutput::failed(format!("{}: {}", ERROR_PREFIX, e));
        }
    };

    let links: Vec<&str> = hits
        .iter()
        .take(MAX_LINKS)
        .filter_map(|hit| hit.link.as_deref())
        .filter(|link| !link.is_empty())
        .collect();

    if links.is_empty() {
        return ToolOutput::not_found(NO_LINKS);
    }

    ToolOutput::found(links.join("\n"))
}
