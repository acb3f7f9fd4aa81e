//! Helpers for one-line diagnostics.

/// At most `max_chars` characters of `text`, cut on a char boundary.
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
