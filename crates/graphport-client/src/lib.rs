//! graphport-client - Client library for the Zep Cloud graph API.
//!
//! # Example
//!
//! ```ignore
//! use graphport_client::ZepClient;
//! use graphport_core::{ClientConfig, GraphClient};
//!
//! let client = ZepClient::new(ClientConfig::from_env()?)?;
//!
//! // Add a memory
//! let episode = client.add_episode("user-123", "I love programming in Rust").await?;
//!
//! // Search facts
//! let edges = client.search_edges("user-123", "programming", 10).await?;
//! ```

mod client;

pub use client::ZepClient;
pub use graphport_core::{Edge, Episode, GraphClient};
