//! Retrying call executor.
//!
//! Wraps a single "add episode" call with bounded exponential backoff:
//! - Transient failures (429, 5xx, the proxy empty-body quirk) are retried
//! - Anything else is returned on the first attempt
//! - A transient failure on the last attempt becomes `RetriesExhausted`

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use graphport_core::{GraphClient, ZepError, ZepResult};

use crate::text::preview;

/// Characters of record content shown in failure diagnostics.
const CONTENT_PREVIEW_CHARS: usize = 80;

/// Characters of response body shown in failure diagnostics.
const BODY_PREVIEW_CHARS: usize = 200;

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Multiplier for exponential backoff
    pub factor: f32,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(2),
            factor: 2.0_f32,
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Waits between attempts, shortest first.
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
            .with_min_delay(self.initial_backoff)
            .with_max_delay(self.max_backoff)
            .with_factor(self.factor)
    }
}

/// Adds one record to the remote graph, retrying transient failures.
pub struct RetryingExecutor {
    client: Arc<dyn GraphClient>,
    policy: RetryPolicy,
}

impl RetryingExecutor {
    /// Create an executor with the default policy.
    pub fn new(client: Arc<dyn GraphClient>) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    /// Create an executor with a custom policy.
    pub fn with_policy(client: Arc<dyn GraphClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Add `content` for `user_id` and return the new episode's identifier.
    ///
    /// `index` only labels diagnostics. `content` must not be blank.
    pub async fn execute(&self, user_id: &str, content: &str, index: usize) -> ZepResult<String> {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let client = self.client.as_ref();
        let max_attempts = self.policy.max_attempts;

        let add_once = move || async move {
            let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
            client.add_episode(user_id, content).await.map_err(|err| {
                tracing::warn!(
                    "ERROR [{}] attempt {}/{}: status={} body={:?} content=({} chars): {:?}",
                    index,
                    attempt,
                    max_attempts,
                    err.status().map_or_else(|| "none".to_string(), |s| s.to_string()),
                    preview(err.body().unwrap_or_default(), BODY_PREVIEW_CHARS),
                    content.chars().count(),
                    preview(content, CONTENT_PREVIEW_CHARS),
                );
                err
            })
        };

        let result = add_once
            .retry(self.policy.backoff())
            .when(|err: &ZepError| err.is_retryable())
            .notify(|_: &ZepError, wait: Duration| {
                tracing::warn!("Retrying [{}] in {:.0}s...", index, wait.as_secs_f64());
            })
            .await;

        match result {
            Ok(episode) => Ok(episode.uuid),
            Err(err) if err.is_retryable() => Err(ZepError::RetriesExhausted {
                attempts: attempts.load(Ordering::Relaxed),
                last: Box::new(err),
            }),
            Err(err) => Err(err),
        }
    }
}
