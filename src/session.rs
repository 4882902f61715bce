//! Chat session - the ordered record of user and assistant turns

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VariantAiError};
use crate::llm::Usage;

/// File name used when exporting without an explicit path
pub const DEFAULT_EXPORT_FILE: &str = "chat_history.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation history with token accounting
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
    usage: Usage,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    pub fn add_usage(&mut self, usage: &Usage) {
        self.usage.add(usage);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn and the token counts
    pub fn reset(&mut self) {
        self.turns.clear();
        self.usage = Usage::default();
    }

    /// History as a JSON array of `{"role", "content"}` objects
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.turns)?)
    }

    /// Write the history to `path`
    pub fn export(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!("Exported {} turns to {}", self.turns.len(), path.display());
        Ok(())
    }

    /// Load a previously exported history
    pub fn import(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let turns: Vec<Turn> = serde_json::from_str(&content)
            .map_err(|e| VariantAiError::Session(format!("{} is not a chat history: {}", path.display(), e)))?;

        info!("Imported {} turns from {}", turns.len(), path.display());
        Ok(Self {
            turns,
            usage: Usage::default(),
        })
    }
}
