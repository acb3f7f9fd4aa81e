//! Memory export format.
//!
//! An export is a JSON array of objects. Only `content` is read; every other
//! field is kept verbatim and otherwise ignored.

use std::path::Path;

use graphport_core::ZepResult;
use serde::{Deserialize, Serialize};

/// One exported memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Memory text. Missing and `null` both read as empty.
    #[serde(default)]
    pub content: Option<String>,

    /// Passthrough fields (ids, timestamps, categories...).
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl MemoryRecord {
    /// Create a record with the given content and no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            metadata: serde_json::Map::new(),
        }
    }

    /// Get the content or an empty string.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Empty or whitespace-only records are never sent.
    pub fn is_blank(&self) -> bool {
        self.content().trim().is_empty()
    }
}

/// Parse an export document.
pub fn parse_export(json: &str) -> ZepResult<Vec<MemoryRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse an export file, keeping record order.
pub async fn load_export(path: &Path) -> ZepResult<Vec<MemoryRecord>> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_export(&json)
}
