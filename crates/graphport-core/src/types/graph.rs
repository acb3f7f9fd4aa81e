//! Graph entities returned by the hosted memory service.

use serde::{Deserialize, Serialize};

/// A single stored text unit, created by an add operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Remote-assigned identifier.
    pub uuid: String,
    /// The stored text.
    #[serde(default)]
    pub content: Option<String>,
    /// Creation timestamp (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Episode {
    /// Create a new episode.
    pub fn new(uuid: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            content: Some(content.into()),
            created_at: None,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Get the content or an empty string.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Calendar date part of the creation timestamp.
    pub fn created_date(&self) -> Option<&str> {
        self.created_at.as_deref().and_then(date_part)
    }
}

/// A derived fact relating two entities in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Remote-assigned identifier.
    pub uuid: String,
    /// Natural-language statement of the fact.
    #[serde(default)]
    pub fact: Option<String>,
    /// When the fact became true.
    #[serde(default)]
    pub valid_at: Option<String>,
    /// When the fact stopped being true.
    #[serde(default)]
    pub invalid_at: Option<String>,
}

impl Edge {
    /// Create a new edge.
    pub fn new(uuid: impl Into<String>, fact: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            fact: Some(fact.into()),
            valid_at: None,
            invalid_at: None,
        }
    }

    /// Set the validity window.
    pub fn with_validity(mut self, valid_at: Option<&str>, invalid_at: Option<&str>) -> Self {
        self.valid_at = valid_at.map(String::from);
        self.invalid_at = invalid_at.map(String::from);
        self
    }

    /// Get the fact or an empty string.
    pub fn fact_or_empty(&self) -> &str {
        self.fact.as_deref().unwrap_or("")
    }

    /// Calendar date the fact became valid.
    pub fn valid_date(&self) -> Option<&str> {
        self.valid_at.as_deref().and_then(date_part)
    }

    /// Calendar date the fact was invalidated.
    pub fn invalid_date(&self) -> Option<&str> {
        self.invalid_at.as_deref().and_then(date_part)
    }
}

/// `YYYY-MM-DD` prefix of a timestamp; blank timestamps have no date.
fn date_part(timestamp: &str) -> Option<&str> {
    if timestamp.is_empty() {
        return None;
    }
    match timestamp.char_indices().nth(10) {
        Some((end, _)) => Some(&timestamp[..end]),
        None => Some(timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_deserialize_partial() {
        let episode: Episode = serde_json::from_str(r#"{"uuid": "ep-1"}"#).unwrap();
        assert_eq!(episode.uuid, "ep-1");
        assert_eq!(episode.content_or_empty(), "");
        assert!(episode.created_date().is_none());
    }

    #[test]
    fn test_created_date_truncates_timestamp() {
        let episode = Episode::new("ep-1", "hi").with_created_at("2024-03-09T12:30:00.123Z");
        assert_eq!(episode.created_date(), Some("2024-03-09"));
    }

    #[test]
    fn test_edge_dates() {
        let edge = Edge::new("e-1", "Alice likes tea")
            .with_validity(Some("2023-01-02T00:00:00Z"), Some(""));
        assert_eq!(edge.valid_date(), Some("2023-01-02"));
        assert_eq!(edge.invalid_date(), None);
    }

    #[test]
    fn test_date_part_counts_characters() {
        assert_eq!(date_part("2024-03-09"), Some("2024-03-09"));
        assert_eq!(date_part("2024"), Some("2024"));
        assert_eq!(date_part("２０２４-03-09T00:00"), Some("２０２４-03-09"));
        assert_eq!(date_part(""), None);
    }

    #[test]
    fn test_edge_ignores_unknown_fields() {
        let edge: Edge = serde_json::from_str(
            r#"{"uuid": "e-1", "fact": "x", "name": "LIKES", "source_node_uuid": "n"}"#,
        )
        .unwrap();
        assert_eq!(edge.fact_or_empty(), "x");
    }
}
