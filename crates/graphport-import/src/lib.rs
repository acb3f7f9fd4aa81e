//! graphport-import - Resumable bulk import into a hosted knowledge graph.
//!
//! Loads a memory export (a JSON array of records with a `content` field),
//! makes sure the target user exists, and adds every non-blank record as a
//! text episode, one call at a time. Transient failures are retried with
//! exponential backoff; permanent ones are counted and the run moves on.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphport_import::{load_export, ImportOptions, Importer, Session};
//!
//! let records = load_export("openmemory-export.json".as_ref()).await?;
//! let session = Session::new(Arc::new(client), "user-123");
//! let mut importer = Importer::new(session, ImportOptions::default().with_resume(200));
//! let report = importer.run(records).await?;
//! println!("{}", report);
//! ```

pub mod export;
pub mod importer;
pub mod retry;
mod text;

pub use export::{load_export, parse_export, MemoryRecord};
pub use importer::{ImportOptions, ImportReport, Importer, Progress, RecordFailure, Session};
pub use retry::{RetryPolicy, RetryingExecutor};
