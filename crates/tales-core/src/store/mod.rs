//! Remote note store abstraction

mod memory;
mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteDraft, NoteId};

pub use memory::{InMemoryNoteStore, StoreOp};
pub use rest::RestNoteStore;

/// Operations the notes controller needs from the record collection.
///
/// Implementations own id and timestamp assignment; callers never fabricate
/// either and always re-read after a mutation.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, newest first by creation time
    async fn list_newest_first(&self) -> Result<Vec<Note>>;

    /// Insert one note
    async fn insert(&self, draft: &NoteDraft) -> Result<()>;

    /// Replace title, body and author of an existing note
    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<()>;

    /// Delete a note by id
    async fn delete(&self, id: &NoteId) -> Result<()>;
}

/// Kind of change announced on the realtime channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Change notification; carries no record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub const fn new(kind: ChangeKind) -> Self {
        Self { kind }
    }
}
