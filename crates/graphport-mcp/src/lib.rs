//! MCP server for Zep Cloud memory.
//!
//! Exposes a user's knowledge graph to MCP clients as three tools. Each
//! tool is a single remote call with no retry; errors are returned to the
//! client as tool errors.
//!
//! # Tools
//!
//! - `add_memory` - Store text as a new episode
//! - `search_memory` - Search facts (edges) in the graph
//! - `list_memory` - List the most recent episodes
//!
//! # Configuration
//!
//! - `ZEP_API_KEY` - Required
//! - `ZEP_USER_ID` - User whose graph is served (default: `default`)
//! - `ZEP_BASE_URL` - Optional API endpoint override
//!
//! # Usage with Claude Desktop
//!
//! Add to your `claude_desktop_config.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "zep-memory": {
//!       "command": "/path/to/graphport-mcp",
//!       "env": { "ZEP_API_KEY": "..." }
//!     }
//!   }
//! }
//! ```

pub mod format;
pub mod server;
pub mod tools;

pub use server::MemoryServer;
