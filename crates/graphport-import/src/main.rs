//! graphport-import - Import a memory export into Zep Cloud.
//!
//! # Configuration
//!
//! - `ZEP_API_KEY` - Required
//! - `ZEP_USER_ID` - Target user when `--user-id` is not given
//! - `ZEP_BASE_URL` - Optional API endpoint override
//!
//! # Usage
//!
//! ```text
//! graphport-import /tmp/openmemory-export.json --delay 0.5
//! graphport-import /tmp/openmemory-export.json --resume 1200
//! graphport-import /tmp/openmemory-export.json --nuke
//! ```
//!
//! Progress and failures go to stderr; the final summary goes to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use graphport_client::ZepClient;
use graphport_core::{resolve_user_id, ClientConfig, ZepError};
use graphport_import::{load_export, ImportOptions, Importer, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Import memories into Zep Cloud
#[derive(Parser)]
#[command(name = "graphport-import", version, about)]
struct Cli {
    /// Path to the memory export JSON
    file: PathBuf,

    /// Delete the user and recreate it before importing (clean slate)
    #[arg(long)]
    nuke: bool,

    /// Target user [default: $ZEP_USER_ID, else "default"]
    #[arg(long)]
    user_id: Option<String>,

    /// Delay between API calls in seconds
    #[arg(long, default_value_t = 0.5)]
    delay: f64,

    /// Skip the first N memories (resume after a partial import)
    #[arg(long, default_value_t = 0)]
    resume: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().map_err(with_hint)?;
    let client = ZepClient::new(config).map_err(with_hint)?;

    let records = load_export(&cli.file)
        .await
        .with_context(|| format!("failed to load export {}", cli.file.display()))?;
    tracing::info!("Loaded {} memories from {}", records.len(), cli.file.display());

    let options = ImportOptions::default()
        .with_nuke(cli.nuke)
        .with_delay_secs(cli.delay)
        .with_resume(cli.resume);
    let session = Session::new(Arc::new(client), resolve_user_id(cli.user_id.as_deref()));
    let mut importer = Importer::new(session, options);

    let report = importer
        .run(records)
        .await
        .map_err(with_hint)
        .with_context(|| format!("failed to prepare user '{}'", importer.session().user_id()))?;

    println!("\n{}", report);
    if let Some(index) = report.first_failure() {
        tracing::info!("First failed record at index {}", index);
    }
    Ok(())
}

/// Log the fix for a fatal error before it ends the run.
fn with_hint(err: ZepError) -> anyhow::Error {
    if let Some(hint) = err.suggestion() {
        tracing::error!("{}", hint);
    }
    err.into()
}
