//! graphport-mcp - Zep Cloud memory tools over MCP stdio.
//!
//! # Configuration
//!
//! - `ZEP_API_KEY` - Required
//! - `ZEP_USER_ID` - User whose graph is served (default: `default`)
//! - `ZEP_BASE_URL` - Optional API endpoint override
//!
//! A `.env` file in the working directory is loaded first if present.

use std::sync::Arc;

use anyhow::{Context, Result};
use graphport_client::ZepClient;
use graphport_core::{resolve_user_id, ClientConfig, ZepError};
use graphport_mcp::MemoryServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the MCP transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ClientConfig::from_env().map_err(with_hint)?;
    let user_id = resolve_user_id(None);
    tracing::info!("Starting Zep MCP server for user '{}'", user_id);

    let server = MemoryServer::new(Arc::new(ZepClient::new(config).map_err(with_hint)?), user_id);
    server
        .ensure_user()
        .await
        .map_err(with_hint)
        .with_context(|| format!("failed to ensure user '{}'", server.user_id()))?;

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    tracing::info!("MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}

/// Log the fix for a fatal startup error before exiting.
fn with_hint(err: ZepError) -> anyhow::Error {
    if let Some(hint) = err.suggestion() {
        tracing::error!("{}", hint);
    }
    err.into()
}
