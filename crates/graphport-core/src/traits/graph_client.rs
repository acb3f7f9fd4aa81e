//! Remote graph client trait.

use async_trait::async_trait;

use crate::error::ZepResult;
use crate::types::{Edge, Episode};

/// Operations against a hosted knowledge-graph memory service.
///
/// Implementations perform exactly one remote call per method and never
/// retry; retry policy belongs to the caller.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Store `data` as a text episode in the user's graph.
    async fn add_episode(&self, user_id: &str, data: &str) -> ZepResult<Episode>;

    /// Search facts (edges) in the user's graph.
    async fn search_edges(&self, user_id: &str, query: &str, limit: usize) -> ZepResult<Vec<Edge>>;

    /// The `lastn` most recent episodes of the user.
    async fn episodes_by_user(&self, user_id: &str, lastn: usize) -> ZepResult<Vec<Episode>>;

    /// Create a user. Fails with an "already exists" error if present.
    async fn add_user(&self, user_id: &str) -> ZepResult<()>;

    /// Delete a user and its graph. Fails with not-found if absent.
    async fn delete_user(&self, user_id: &str) -> ZepResult<()>;

    /// Create the user unless it already exists.
    async fn ensure_user(&self, user_id: &str) -> ZepResult<()> {
        match self.add_user(user_id).await {
            Err(e) if e.is_already_exists() => Ok(()),
            other => other,
        }
    }
}
