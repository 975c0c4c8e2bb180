//! Controller-owned state of the notes section.

use crate::models::{Note, NoteId};
use crate::search::filter_notes;
use crate::view::ListenerId;

/// Page section currently visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Notes,
    Other(String),
}

impl Default for Section {
    fn default() -> Self {
        Self::Other("about".to_string())
    }
}

/// Reader overlay currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReader {
    pub note_id: NoteId,
    /// Escape listener registered when the overlay opened
    pub escape_listener: ListenerId,
}

/// All mutable state of the notes section.
///
/// `filtered` is always re-derived from `cache` and `search_term`; nothing
/// else writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesState {
    /// Last successful fetch, newest first
    pub cache: Vec<Note>,
    /// Subset of `cache` matching `search_term`, in cache order
    pub filtered: Vec<Note>,
    pub search_term: String,
    /// A full reload is in flight
    pub is_loading: bool,
    /// A create/update request is in flight
    pub submitting: bool,
    /// Target of the open edit form; `None` when creating
    pub editing: Option<NoteId>,
    pub visible_section: Section,
    pub reader: Option<OpenReader>,
}

impl NotesState {
    /// Replace the cache wholesale and re-derive the filtered view.
    pub fn replace_cache(&mut self, notes: Vec<Note>) {
        self.cache = notes;
        self.refilter();
    }

    /// Set the search term and re-derive the filtered view.
    pub fn apply_search(&mut self, query: &str) {
        query.clone_into(&mut self.search_term);
        self.refilter();
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.cache.iter().find(|note| &note.id == id)
    }

    pub fn notes_visible(&self) -> bool {
        self.visible_section == Section::Notes
    }

    fn refilter(&mut self) {
        self.filtered = filter_notes(&self.cache, &self.search_term);
    }
}
