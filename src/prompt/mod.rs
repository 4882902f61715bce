//! Prompt framing - the system message and the grounded user prompt
//!
//! The grounded prompt is rendered with Handlebars so retrieved passages and
//! the question are inserted verbatim.

mod render;

pub use render::PromptRenderer;

/// System message sent ahead of every request
pub const SYSTEM_PROMPT: &str = "You are VariantAI, a genomic variant interpreter.";

/// User prompt wrapping the retrieved context and the literal question
pub const GROUNDED_TEMPLATE: &str = "
You are VariantAI, a helpful assistant for genomic variant interpretation.
Answer user questions using the provided context. If the answer is not in context, say you don’t know.

Context:
{{context}}

Question:
{{question}}
";

/// Join retrieved passages into one block, separated by blank lines
pub fn grounding_block<S: AsRef<str>>(passages: &[S]) -> String {
    passages.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n")
}
