//! Display-region content for the notes section.
//!
//! Rendering is a pure function of [`NotesState`]: the controller rebuilds the
//! whole display after every load or filter and hands it to the view, which
//! replaces whatever it showed before.

mod html;

use chrono::{DateTime, Utc};

use crate::controller::NotesState;
use crate::models::{Note, NoteId};

pub const LOADING_MESSAGE: &str = "Loading your stories...";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load notes. Please refresh and try again.";
pub const NO_NOTES_MESSAGE: &str = "No stories yet. Create your first one!";
pub const NO_MATCHES_MESSAGE: &str = "No stories match your search.";

const ELLIPSIS: &str = "...";

/// Why the filtered view is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The cache itself is empty
    NoNotes,
    /// The cache has notes but none match the search term
    NoMatches,
}

impl EmptyState {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::NoNotes => "📚",
            Self::NoMatches => "🔍",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::NoNotes => NO_NOTES_MESSAGE,
            Self::NoMatches => NO_MATCHES_MESSAGE,
        }
    }
}

/// One card in the notes list. Text fields are raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    pub preview: String,
    pub author: String,
}

/// Everything the display region can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayContent {
    Loading,
    LoadFailed,
    Empty(EmptyState),
    Cards(Vec<NoteCard>),
}

/// Full-detail reader overlay for a single note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderView {
    pub id: NoteId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub body: String,
}

impl ReaderView {
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            author: note.author.clone(),
            date: format_date(note.created_at),
            body: note.body.clone(),
        }
    }
}

/// Cut `text` to `max_chars` characters, appending "..." when anything was cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    }
}

#[must_use]
pub fn note_card(note: &Note, preview_chars: usize) -> NoteCard {
    NoteCard {
        id: note.id.clone(),
        title: note.title.clone(),
        preview: truncate_text(&note.body, preview_chars),
        author: note.author.clone(),
    }
}

/// Display content for the current filtered view.
#[must_use]
pub fn render_notes(state: &NotesState, preview_chars: usize) -> DisplayContent {
    if state.filtered.is_empty() {
        let empty = if state.cache.is_empty() {
            EmptyState::NoNotes
        } else {
            EmptyState::NoMatches
        };
        return DisplayContent::Empty(empty);
    }

    DisplayContent::Cards(
        state
            .filtered
            .iter()
            .map(|note| note_card(note, preview_chars))
            .collect(),
    )
}

/// Stats label for the given cache and filtered-view sizes.
#[must_use]
pub fn stats_label(total: usize, showing: usize) -> String {
    if total == 0 {
        return "📊 No notes yet".to_string();
    }

    let noun = if total == 1 { "story" } else { "stories" };
    if showing == total {
        format!("📊 {total} {noun}")
    } else {
        format!("📊 Showing {showing} of {total} {noun}")
    }
}

fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}
