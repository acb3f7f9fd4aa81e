//! Import orchestrator.
//!
//! Drives one run end to end:
//!
//! 1. reset the target user when a clean slate is requested, otherwise make
//!    sure it exists;
//! 2. drop the first `resume` records;
//! 3. add the remaining records in export order, one call at a time,
//!    counting successes, failures and skipped blanks;
//! 4. report progress every [`PROGRESS_INTERVAL`] records and a summary at
//!    the end.
//!
//! Per-record failures never abort the run. Indices in diagnostics are
//! absolute positions in the export, so a progress line can be fed straight
//! back in as `--resume`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use graphport_core::{GraphClient, ZepResult};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::export::MemoryRecord;
use crate::retry::RetryingExecutor;
use crate::text::preview;

/// Records between two progress reports.
pub const PROGRESS_INTERVAL: usize = 50;

/// Characters of an error message kept in a failure line.
const FAILURE_PREVIEW_CHARS: usize = 120;

/// Default pause after each attempted add.
const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Remote client and target user for one run.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn GraphClient>,
    user_id: String,
}

impl Session {
    /// Create a session targeting `user_id`.
    pub fn new(client: Arc<dyn GraphClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// The target user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Run options.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Delete and recreate the user before importing.
    pub nuke: bool,
    /// Pause after every attempted add. Zero disables pacing.
    pub delay: Duration,
    /// Number of leading records to skip.
    pub resume: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            nuke: false,
            delay: DEFAULT_DELAY,
            resume: 0,
        }
    }
}

impl ImportOptions {
    /// Builder: request a clean slate
    pub fn with_nuke(mut self, nuke: bool) -> Self {
        self.nuke = nuke;
        self
    }

    /// Builder: set the pacing delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Builder: set the pacing delay in seconds; negative or invalid means none
    pub fn with_delay_secs(self, secs: f64) -> Self {
        let delay = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::ZERO);
        self.with_delay(delay)
    }

    /// Builder: skip the first `resume` records
    pub fn with_resume(mut self, resume: usize) -> Self {
        self.resume = resume;
        self
    }
}

/// Snapshot emitted every [`PROGRESS_INTERVAL`] records.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Absolute position of the last processed record (1-based).
    pub position: usize,
    /// Records in the whole export.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Records per second since the run started.
    pub rate: f64,
    pub elapsed: Duration,
    /// Linear extrapolation of the time left at the current rate.
    pub remaining: Duration,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {} ok, {} fail, {} skip, {:.1}/s, {:.0}s elapsed, ~{:.0}s remaining",
            self.position,
            self.total,
            self.succeeded,
            self.failed,
            self.skipped,
            self.rate,
            self.elapsed.as_secs_f64(),
            self.remaining.as_secs_f64()
        )
    }
}

/// A record that could not be imported.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// Absolute position in the export.
    pub index: usize,
    /// Truncated error message.
    pub message: String,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Failed records in export order.
    pub failures: Vec<RecordFailure>,
}

impl ImportReport {
    /// Check if every attempted record was imported.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Absolute index of the first failure, a natural `--resume` point.
    pub fn first_failure(&self) -> Option<usize> {
        self.failures.first().map(|f| f.index)
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done: {} succeeded, {} failed, {} skipped, {:.0}s total",
            self.succeeded,
            self.failed,
            self.skipped,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Counters owned by the main loop.
struct RunState {
    succeeded: usize,
    failed: usize,
    skipped: usize,
    failures: Vec<RecordFailure>,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl RunState {
    fn start() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            skipped: 0,
            failures: Vec::new(),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// `done` of `remaining + done` working-set records are processed.
    fn progress(&self, position: usize, total: usize, done: usize, remaining: usize) -> Progress {
        let elapsed = self.started.elapsed();
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { done as f64 / secs } else { 0.0 };
        let remaining = if rate > 0.0 {
            Duration::from_secs_f64(remaining as f64 / rate)
        } else {
            Duration::ZERO
        };

        Progress {
            position,
            total,
            succeeded: self.succeeded,
            failed: self.failed,
            skipped: self.skipped,
            rate,
            elapsed,
            remaining,
        }
    }

    fn finish(self) -> ImportReport {
        ImportReport {
            succeeded: self.succeeded,
            failed: self.failed,
            skipped: self.skipped,
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
            failures: self.failures,
        }
    }
}

type ProgressObserver = Box<dyn FnMut(&Progress) + Send>;

/// Sequential, resumable importer.
pub struct Importer {
    session: Session,
    executor: RetryingExecutor,
    options: ImportOptions,
    observer: Option<ProgressObserver>,
}

impl Importer {
    /// Create an importer with the default retry policy.
    pub fn new(session: Session, options: ImportOptions) -> Self {
        let executor = RetryingExecutor::new(session.client.clone());
        Self {
            session,
            executor,
            options,
            observer: None,
        }
    }

    /// Builder: receive every progress snapshot
    pub fn on_progress(mut self, observer: impl FnMut(&Progress) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The session this importer writes to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Import `records` into the session's user.
    ///
    /// Fails only when the user cannot be provisioned; record failures are
    /// reported in the returned [`ImportReport`].
    pub async fn run(&mut self, records: Vec<MemoryRecord>) -> ZepResult<ImportReport> {
        self.prepare_user().await?;
        Ok(self.process(records).await)
    }

    /// Reset or ensure the target user.
    async fn prepare_user(&self) -> ZepResult<()> {
        let client = self.session.client.as_ref();
        let user_id = self.session.user_id.as_str();

        if self.options.nuke {
            info!("Nuking user '{}'...", user_id);
            if let Err(e) = client.delete_user(user_id).await {
                tracing::debug!("Delete of user '{}' ignored: {}", user_id, e);
            }
            client.ensure_user(user_id).await?;
            info!("Clean slate.");
        } else {
            client.ensure_user(user_id).await?;
        }
        Ok(())
    }

    /// Main loop over the records after the resume offset.
    async fn process(&mut self, records: Vec<MemoryRecord>) -> ImportReport {
        let resume = self.options.resume;
        let total = records.len();
        if resume > 0 {
            info!(
                "Resuming from index {}, skipping first {} memories",
                resume, resume
            );
        }
        let working: Vec<MemoryRecord> = records.into_iter().skip(resume).collect();
        let count = working.len();

        let mut state = RunState::start();
        for (i, record) in working.iter().enumerate() {
            let index = i + resume;
            if record.is_blank() {
                state.skipped += 1;
                continue;
            }

            match self
                .executor
                .execute(&self.session.user_id, record.content(), index)
                .await
            {
                Ok(_) => state.succeeded += 1,
                Err(e) => {
                    let message = preview(&e.to_string(), FAILURE_PREVIEW_CHARS).to_string();
                    warn!("FAIL [{}]: {}", index, message);
                    state.failed += 1;
                    state.failures.push(RecordFailure { index, message });
                }
            }

            if !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }

            let done = i + 1;
            if done % PROGRESS_INTERVAL == 0 {
                let progress = state.progress(index + 1, total.max(resume), done, count - done);
                info!("{}", progress);
                if let Some(observer) = self.observer.as_mut() {
                    observer(&progress);
                }
            }
        }

        let report = state.finish();
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Import finished"
        );
        report
    }
}
