//! Client-side note filtering.
//!
//! A linear case-insensitive substring match over the cached notes. There is
//! no index; the cache is small and re-filtered wholesale on every change.

use crate::models::Note;

/// Trim and lowercase a raw search query.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Notes whose title, body or author contains `query`, in cache order.
///
/// A blank query yields a copy of the whole cache.
#[must_use]
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return notes.to_vec();
    }

    notes
        .iter()
        .filter(|note| note.matches(&needle))
        .cloned()
        .collect()
}
