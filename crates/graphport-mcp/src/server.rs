//! MCP server implementation for Zep Cloud memory.
//!
//! Uses the rmcp SDK's macro-based approach for defining tools.

use std::sync::Arc;

use graphport_core::{GraphClient, ZepError, ZepResult};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use crate::format::{format_edges, format_episodes};
use crate::tools::*;

/// MCP server for one user's Zep knowledge graph.
///
/// Every tool call is a single remote request against `user_id`.
#[derive(Clone)]
pub struct MemoryServer {
    client: Arc<dyn GraphClient>,
    user_id: Arc<str>,
    tool_router: ToolRouter<MemoryServer>,
}

#[tool_router]
impl MemoryServer {
    /// Create a server bound to `user_id`.
    pub fn new(client: Arc<dyn GraphClient>, user_id: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "add_memory",
        description = "Add information to the knowledge graph. Use this to store facts, preferences, and information about the user that should be remembered across conversations."
    )]
    async fn add_memory(
        &self,
        Parameters(input): Parameters<AddMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.store(&input.content).await)
    }

    #[tool(
        name = "search_memory",
        description = "Search the knowledge graph for relevant facts. Returns facts (relationships between entities) that match the query, using hybrid semantic, keyword and graph search."
    )]
    async fn search_memory(
        &self,
        Parameters(input): Parameters<SearchMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.search(&input.query, input.effective_limit()).await)
    }

    #[tool(
        name = "list_memory",
        description = "List stored memories (episodes) without a specific search query. Use when the user asks what you know about them, or for a broad overview. Returns the most recent episodes as originally stored; for targeted lookups use search_memory instead."
    )]
    async fn list_memory(
        &self,
        Parameters(input): Parameters<ListMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.list(input.effective_limit()).await)
    }
}

impl MemoryServer {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Make sure the served user exists. An existing user is fine.
    pub async fn ensure_user(&self) -> ZepResult<()> {
        self.client.ensure_user(&self.user_id).await
    }

    /// Store `content` as a text episode and report its id.
    pub async fn store(&self, content: &str) -> ZepResult<String> {
        let episode = self.client.add_episode(&self.user_id, content).await?;
        tracing::debug!(episode = %episode.uuid, "Stored episode");
        Ok(format!("Stored (episode {})", episode.uuid))
    }

    /// Search facts; `limit` is capped at [`MAX_SEARCH_LIMIT`].
    pub async fn search(&self, query: &str, limit: usize) -> ZepResult<String> {
        let limit = limit.min(MAX_SEARCH_LIMIT);
        let edges = self.client.search_edges(&self.user_id, query, limit).await?;
        Ok(format_edges(&edges))
    }

    /// List recent episodes; `limit` is capped at [`MAX_LIST_LIMIT`].
    pub async fn list(&self, limit: usize) -> ZepResult<String> {
        let limit = limit.min(MAX_LIST_LIMIT);
        let episodes = self.client.episodes_by_user(&self.user_id, limit).await?;
        Ok(format_episodes(&episodes))
    }
}

fn respond(result: ZepResult<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => Err(to_mcp_error(e)),
    }
}

fn to_mcp_error(e: ZepError) -> McpError {
    tracing::warn!(code = e.code().as_str(), "Tool call failed: {}", e);
    match &e {
        ZepError::Api { status: 400 | 422, .. } => McpError::invalid_params(e.to_string(), None),
        _ => McpError::internal_error(e.to_string(), None),
    }
}

#[tool_handler]
impl ServerHandler for MemoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Zep memory server - a persistent knowledge graph for AI assistants. \
                 Use add_memory to store information about the user, search_memory to \
                 find relevant facts, and list_memory to review recent memories."
                    .to_string(),
            ),
        }
    }
}
