//! Tool System - declarations, executors, and dispatch
//!
//! The tool set is a closed enumeration. Every `ToolKind` has exactly one
//! declaration in the registry and one executor arm in `ToolExecutor`.

mod clinical;
mod consequence;
mod executor;
mod gene;
mod literature;
mod registry;

pub use clinical::get_clinical_info;
pub use consequence::get_consequence_info;
pub use executor::{ToolExecutor, UNKNOWN_TOOL};
pub use gene::get_gene_name;
pub use literature::show_literature;
pub use registry::{ParamType, ParameterSpec, ToolDeclaration, ToolRegistry};

use serde::Serialize;

/// Every tool the model may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    ConsequenceInfo,
    GeneName,
    Literature,
    ClinicalInfo,
}

impl ToolKind {
    /// Declaration order exposed to the model
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ConsequenceInfo,
        ToolKind::GeneName,
        ToolKind::Literature,
        ToolKind::ClinicalInfo,
    ];

    /// Wire name the model uses to call this tool
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConsequenceInfo => "get_consequence_info",
            Self::GeneName => "get_gene_name",
            Self::Literature => "show_literature",
            Self::ClinicalInfo => "get_clinical_info",
        }
    }

    /// Resolve a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How an executor's lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// The source answered with usable data
    Found,
    /// The source answered but had nothing for this input
    NotFound,
    /// The fetch itself failed
    Failed,
}

/// Text produced by an executor. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub kind: OutputKind,
}

impl ToolOutput {
    pub fn found(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: OutputKind::Found,
        }
    }

    pub fn not_found(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: OutputKind::NotFound,
        }
    }

    pub fn failed(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: OutputKind::Failed,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutputKind::Failed
    }
}
