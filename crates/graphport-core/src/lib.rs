//! graphport-core - Core library for graphport.
//!
//! This crate provides the error hierarchy, the remote graph data types and
//! the [`GraphClient`] trait that both the bulk importer and the MCP server
//! are written against.
//!
//! # Example
//!
//! ```ignore
//! use graphport_core::{ClientConfig, GraphClient};
//!
//! let config = ClientConfig::from_env()?;
//! let client = graphport_client::ZepClient::new(config)?;
//!
//! client.add_user("user-123").await?;
//! let episode = client.add_episode("user-123", "I love programming in Rust").await?;
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{resolve_user_id, ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_ID};
pub use error::{ErrorCode, ZepError, ZepResult};
pub use traits::GraphClient;
pub use types::{Edge, Episode};
