//! In-process note store.
//!
//! Behaves like the hosted table (store-assigned ids and timestamps, newest
//! first, change notifications) and exposes failure switches and call
//! counters so controller behavior can be exercised without a network.
//!
//! Like a PostgREST filter, an update or delete that matches no row succeeds
//! and announces nothing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, Mutex, Semaphore};

use super::{ChangeEvent, ChangeKind, NoteStore};
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};

/// Store operation, used for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
struct MemoryState {
    /// Newest first
    notes: Vec<Note>,
    next_id: u64,
    subscribers: Vec<mpsc::Sender<ChangeEvent>>,
}

#[derive(Clone)]
pub struct InMemoryNoteStore {
    state: Arc<Mutex<MemoryState>>,
    failing: Arc<[AtomicBool; 4]>,
    calls: Arc<[AtomicUsize; 4]>,
    list_gated: Arc<AtomicBool>,
    list_gate: Arc<Semaphore>,
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            failing: Arc::new(Default::default()),
            calls: Arc::new(Default::default()),
            list_gated: Arc::new(AtomicBool::new(false)),
            list_gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Seed the store; the last draft ends up newest.
    pub async fn with_notes(drafts: &[NoteDraft]) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().await;
            for draft in drafts {
                Self::push_note(&mut state, draft);
            }
        }
        store
    }

    /// Receive a notification for every successful mutation.
    pub async fn subscribe(&self) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel(32);
        self.state.lock().await.subscribers.push(tx);
        rx
    }

    /// Make every subsequent call of `op` fail (or succeed again).
    pub fn set_failing(&self, op: StoreOp, failing: bool) {
        self.failing[Self::slot(op)].store(failing, Ordering::SeqCst);
    }

    /// Number of times `op` was attempted.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls[Self::slot(op)].load(Ordering::SeqCst)
    }

    /// Total attempted calls across all operations.
    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Hold listing calls until `release_listing` hands out permits.
    pub fn hold_listing(&self) {
        self.list_gated.store(true, Ordering::SeqCst);
    }

    /// Let `count` held listing calls complete.
    pub fn release_listing(&self, count: usize) {
        self.list_gate.add_permits(count);
    }

    /// Snapshot of the stored notes, newest first.
    pub async fn snapshot(&self) -> Vec<Note> {
        self.state.lock().await.notes.clone()
    }

    const fn slot(op: StoreOp) -> usize {
        match op {
            StoreOp::List => 0,
            StoreOp::Insert => 1,
            StoreOp::Update => 2,
            StoreOp::Delete => 3,
        }
    }

    fn begin(&self, op: StoreOp) -> Result<()> {
        self.calls[Self::slot(op)].fetch_add(1, Ordering::SeqCst);
        if self.failing[Self::slot(op)].load(Ordering::SeqCst) {
            Err(Error::Api(format!("simulated {op:?} failure")))
        } else {
            Ok(())
        }
    }

    fn push_note(state: &mut MemoryState, draft: &NoteDraft) -> NoteId {
        state.next_id += 1;
        let id = NoteId::from(state.next_id);
        state.notes.insert(
            0,
            Note {
                id: id.clone(),
                title: draft.title.clone(),
                body: draft.body.clone(),
                author: draft.author.clone(),
                created_at: Utc::now(),
            },
        );
        id
    }

    fn notify(state: &mut MemoryState, kind: ChangeKind) {
        state.subscribers.retain(|tx| {
            !matches!(
                tx.try_send(ChangeEvent::new(kind)),
                Err(mpsc::error::TrySendError::Closed(_))
            )
        });
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list_newest_first(&self) -> Result<Vec<Note>> {
        self.begin(StoreOp::List)?;
        if self.list_gated.load(Ordering::SeqCst) {
            let permit = self
                .list_gate
                .acquire()
                .await
                .map_err(|error| Error::Api(error.to_string()))?;
            permit.forget();
        }
        Ok(self.snapshot().await)
    }

    async fn insert(&self, draft: &NoteDraft) -> Result<()> {
        self.begin(StoreOp::Insert)?;
        let mut state = self.state.lock().await;
        Self::push_note(&mut state, draft);
        Self::notify(&mut state, ChangeKind::Insert);
        Ok(())
    }

    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<()> {
        self.begin(StoreOp::Update)?;
        let mut state = self.state.lock().await;
        let Some(note) = state.notes.iter_mut().find(|note| &note.id == id) else {
            return Ok(());
        };
        note.title.clone_from(&draft.title);
        note.body.clone_from(&draft.body);
        note.author.clone_from(&draft.author);
        Self::notify(&mut state, ChangeKind::Update);
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        self.begin(StoreOp::Delete)?;
        let mut state = self.state.lock().await;
        let before = state.notes.len();
        state.notes.retain(|note| &note.id != id);
        if state.notes.len() == before {
            return Ok(());
        }
        Self::notify(&mut state, ChangeKind::Delete);
        Ok(())
    }
}
