//! Data models for Tales

mod note;

pub use note::{Note, NoteDraft, NoteId};
