//! VariantAI - genomic variant question answering
//!
//! Answers are grounded on passages retrieved from a reference collection.
//! The language model may call variant lookup tools (clinical significance,
//! gene name, predicted consequence) and a literature search before giving
//! its final answer.

pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod sources;
pub mod tools;

pub use error::{Result, VariantAiError};
pub use orchestrator::{Answer, AnswerPath, Orchestrator};
pub use session::ChatSession;
