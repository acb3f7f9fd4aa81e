//! MCP tool input type definitions.
//!
//! These types are used with `schemars::JsonSchema` to generate the JSON Schema
//! that MCP clients use to understand tool parameters.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

/// Upper bound on `search_memory` results.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Upper bound on `list_memory` results.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Input for add_memory tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryInput {
    /// The text to remember.
    pub content: String,
}

/// Input for search_memory tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryInput {
    /// What to look for in the stored facts.
    pub query: String,

    /// Maximum results to return (at most 50).
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

impl SearchMemoryInput {
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_SEARCH_LIMIT)
    }
}

fn default_search_limit() -> usize {
    10
}

/// Input for list_memory tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListMemoryInput {
    /// Number of recent episodes to return (at most 1000).
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

impl ListMemoryInput {
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_LIST_LIMIT)
    }
}

impl Default for ListMemoryInput {
    fn default() -> Self {
        Self {
            limit: default_list_limit(),
        }
    }
}

fn default_list_limit() -> usize {
    50
}
