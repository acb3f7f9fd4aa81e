//! Plain-text rendering of graph results for tool output.

use graphport_core::{Edge, Episode};

pub const NO_RESULTS: &str = "No results found.";
pub const NO_MEMORIES: &str = "No memories stored yet.";

/// Render facts as a numbered list with their validity window.
///
/// Numbering follows result order; facts with empty text are left out
/// without renumbering the rest.
pub fn format_edges(edges: &[Edge]) -> String {
    let lines: Vec<String> = edges
        .iter()
        .enumerate()
        .filter_map(|(i, edge)| {
            let fact = edge.fact_or_empty();
            if fact.is_empty() {
                return None;
            }
            Some(format!("{}. {}{}", i + 1, fact, validity(edge)))
        })
        .collect();

    if lines.is_empty() {
        NO_RESULTS.to_string()
    } else {
        lines.join("\n")
    }
}

fn validity(edge: &Edge) -> String {
    match (edge.valid_date(), edge.invalid_date()) {
        (Some(valid), Some(invalid)) => format!(" (valid: {} - invalid: {})", valid, invalid),
        (Some(valid), None) => format!(" (valid: {})", valid),
        _ => String::new(),
    }
}

/// Render episodes as a numbered list, prefixed with their creation date.
pub fn format_episodes(episodes: &[Episode]) -> String {
    let lines: Vec<String> = episodes
        .iter()
        .enumerate()
        .filter_map(|(i, episode)| {
            let content = episode.content_or_empty();
            if content.is_empty() {
                return None;
            }
            let line = match episode.created_date() {
                Some(date) => format!("{}. [{}] {}", i + 1, date, content),
                None => format!("{}. {}", i + 1, content),
            };
            Some(line)
        })
        .collect();

    if lines.is_empty() {
        NO_MEMORIES.to_string()
    } else {
        lines.join("\n")
    }
}
