//! Presentation collaborator of the notes controller.
//!
//! The controller never builds widgets itself; it pushes rendered content and
//! messages into whatever surface implements [`NotesView`] (a browser DOM
//! bridge, a terminal, a test recorder).

use crate::models::NoteDraft;
use crate::render::{DisplayContent, ReaderView};

/// Handle of a registered global key listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Keys the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

pub trait NotesView: Send {
    /// Replace the display region's content
    fn show_display(&mut self, content: &DisplayContent);

    /// Set the stats label text
    fn show_stats(&mut self, label: &str);

    /// Show the creation/edit form filled with `values`
    fn show_form(&mut self, values: &NoteDraft);

    /// Reset and hide the form
    fn hide_form(&mut self);

    /// Toggle the Save action between its normal and busy state
    fn set_submit_busy(&mut self, busy: bool);

    /// Blocking user-visible message
    fn alert(&mut self, message: &str);

    /// Ask the user to confirm a destructive action
    fn confirm(&mut self, message: &str) -> bool;

    fn show_reader(&mut self, reader: &ReaderView);

    fn close_reader(&mut self);

    /// Register a global Escape listener for an overlay
    fn add_escape_listener(&mut self) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);
}
