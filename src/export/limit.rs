//! Output ceiling for card descriptions.

use crate::config::TRUNCATION_MARKER;

/// Cut `document` to `max_chars` characters and append the truncation marker.
///
/// Documents at or below the ceiling are returned unchanged. Must run after
/// formatting, which adds the header block and markers.
pub fn enforce_limit(document: &str, max_chars: usize) -> String {
    match document.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            tracing::debug!(
                max_chars,
                dropped = document[cut..].chars().count(),
                "Truncating card body"
            );
            format!("{}{TRUNCATION_MARKER}", &document[..cut])
        }
        None => document.to_string(),
    }
}
