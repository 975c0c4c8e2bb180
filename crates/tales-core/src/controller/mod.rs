//! Notes view controller.
//!
//! Owns the note cache, the filtered view and the display region. Every
//! operation follows the same shape: optionally call the store, then mutate
//! [`NotesState`] and redraw. State is never locked across a store call, so a
//! failed request always leaves the previous cache in place.

mod event_loop;
mod state;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::ControllerConfig;
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::models::{NoteDraft, NoteId};
use crate::render::{render_notes, stats_label, DisplayContent, ReaderView};
use crate::store::{ChangeEvent, NoteStore};
use crate::view::{Key, NotesView};

pub use event_loop::{run, UiEvent};
pub use state::{NotesState, OpenReader, Section};

pub const VALIDATION_MESSAGE: &str = "Please fill in all fields!";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save note. Please try again.";
pub const DELETE_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this story? This action cannot be undone.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete note. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Another load was already in flight
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// A field was empty; nothing was sent
    Rejected,
    /// A previous submit is still in flight
    Busy,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Failed,
}

struct Inner<V> {
    state: NotesState,
    view: V,
    search: Debouncer<String>,
}

pub struct NotesController<V> {
    store: Arc<dyn NoteStore>,
    inner: Arc<Mutex<Inner<V>>>,
    config: ControllerConfig,
}

impl<V> Clone for NotesController<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<V: NotesView + 'static> NotesController<V> {
    pub fn new(store: Arc<dyn NoteStore>, view: V, config: ControllerConfig) -> Self {
        Self {
            store,
            inner: Arc::new(Mutex::new(Inner {
                state: NotesState::default(),
                view,
                search: Debouncer::new(config.search_debounce),
            })),
            config,
        }
    }

    pub const fn config(&self) -> ControllerConfig {
        self.config
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> NotesState {
        self.inner.lock().await.state.clone()
    }

    /// Run `f` against the view.
    pub async fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut inner = self.inner.lock().await;
        f(&mut inner.view)
    }

    /// Refetch every note and redraw.
    ///
    /// Ignored while another load is in flight. On failure the error
    /// placeholder replaces the display and the cache keeps its old content.
    pub async fn load_notes(&self) -> LoadOutcome {
        {
            let mut inner = self.inner.lock().await;
            if inner.state.is_loading {
                tracing::debug!("Load already in flight; skipping");
                return LoadOutcome::Skipped;
            }
            inner.state.is_loading = true;
            inner.view.show_display(&DisplayContent::Loading);
        }

        let result = self.store.list_newest_first().await;

        let mut inner = self.inner.lock().await;
        inner.state.is_loading = false;
        match result {
            Ok(notes) => {
                let count = notes.len();
                tracing::debug!("Loaded {} notes", count);
                inner.state.replace_cache(notes);
                self.redraw(&mut inner);
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                tracing::warn!("Failed to load notes: {}", error);
                inner.view.show_display(&DisplayContent::LoadFailed);
                LoadOutcome::Failed
            }
        }
    }

    /// Filter the cache by `query` immediately and redraw.
    ///
    /// Supersedes any keystroke still waiting out its debounce window.
    pub async fn search_notes(&self, query: &str) {
        let mut inner = self.inner.lock().await;
        inner.search.cancel();
        inner.state.apply_search(query);
        tracing::debug!(
            "Search {:?} matched {} of {} notes",
            inner.state.search_term.trim(),
            inner.state.filtered.len(),
            inner.state.cache.len()
        );
        self.redraw(&mut inner);
    }

    /// Keystroke entry point; the filter runs once input settles.
    pub async fn search_input(&self, raw: &str) {
        self.inner.lock().await.search.push(raw.to_string());
    }

    /// Deadline of the pending debounced search, if any.
    pub async fn search_deadline(&self) -> Option<Instant> {
        self.inner.lock().await.search.deadline()
    }

    /// Apply the debounced search if its quiet period has elapsed.
    pub async fn fire_pending_search(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(query) = inner.search.take_ready() else {
            return false;
        };
        inner.state.apply_search(&query);
        self.redraw(&mut inner);
        true
    }

    /// Rebuild the display region from the current filtered list.
    pub async fn render_notes(&self) {
        let mut inner = self.inner.lock().await;
        self.draw_display(&mut inner);
    }

    pub async fn update_notes_stats(&self) {
        let mut inner = self.inner.lock().await;
        Self::draw_stats(&mut inner);
    }

    /// Open an empty creation form.
    pub async fn new_story(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.editing = None;
        inner.view.show_form(&NoteDraft::default());
    }

    /// Open the form prefilled with a cached note and target it for update.
    pub async fn edit_note(&self, id: &NoteId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let draft = inner
            .state
            .find(id)
            .map(crate::models::Note::to_draft)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Self::close_reader_locked(&mut inner);
        inner.state.editing = Some(id.clone());
        inner.view.show_form(&draft);
        Ok(())
    }

    pub async fn close_form(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.editing = None;
        inner.view.hide_form();
    }

    /// Create or update from form values, then reload.
    pub async fn submit(&self, draft: NoteDraft) -> SubmitOutcome {
        let Ok(draft) = draft.normalized() else {
            self.inner.lock().await.view.alert(VALIDATION_MESSAGE);
            return SubmitOutcome::Rejected;
        };

        let editing = {
            let mut inner = self.inner.lock().await;
            if inner.state.submitting {
                return SubmitOutcome::Busy;
            }
            inner.state.submitting = true;
            inner.view.set_submit_busy(true);
            inner.state.editing.clone()
        };

        let result = match &editing {
            Some(id) => self.store.update(id, &draft).await,
            None => self.store.insert(&draft).await,
        };

        let outcome = match result {
            Ok(()) => {
                match &editing {
                    Some(id) => tracing::info!("Updated note {}", id),
                    None => tracing::info!("Created note {:?}", draft.title),
                }
                {
                    let mut inner = self.inner.lock().await;
                    inner.state.editing = None;
                    inner.view.hide_form();
                }
                self.load_notes().await;
                SubmitOutcome::Saved
            }
            Err(error) => {
                tracing::warn!("Failed to save note: {}", error);
                self.inner.lock().await.view.alert(SAVE_FAILED_MESSAGE);
                SubmitOutcome::Failed
            }
        };

        let mut inner = self.inner.lock().await;
        inner.state.submitting = false;
        inner.view.set_submit_busy(false);
        outcome
    }

    /// Delete after confirmation, then reload.
    pub async fn delete_note(&self, id: &NoteId) -> DeleteOutcome {
        let confirmed = self
            .inner
            .lock()
            .await
            .view
            .confirm(DELETE_CONFIRM_MESSAGE);
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }

        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!("Deleted note {}", id);
                {
                    let mut inner = self.inner.lock().await;
                    if inner
                        .state
                        .reader
                        .as_ref()
                        .is_some_and(|reader| &reader.note_id == id)
                    {
                        Self::close_reader_locked(&mut inner);
                    }
                }
                self.load_notes().await;
                DeleteOutcome::Deleted
            }
            Err(error) => {
                tracing::warn!("Failed to delete note {}: {}", id, error);
                self.inner.lock().await.view.alert(DELETE_FAILED_MESSAGE);
                DeleteOutcome::Failed
            }
        }
    }

    /// Show a cached note in the reader overlay.
    pub async fn open_reader(&self, id: &NoteId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let reader = inner
            .state
            .find(id)
            .map(ReaderView::from_note)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        Self::close_reader_locked(&mut inner);
        inner.view.show_reader(&reader);
        let escape_listener = inner.view.add_escape_listener();
        inner.state.reader = Some(OpenReader {
            note_id: id.clone(),
            escape_listener,
        });
        Ok(())
    }

    pub async fn close_reader(&self) {
        let mut inner = self.inner.lock().await;
        Self::close_reader_locked(&mut inner);
    }

    pub async fn handle_key(&self, key: Key) {
        if key == Key::Escape {
            self.close_reader().await;
        }
    }

    /// Record the visible section; the first visit to notes loads them.
    pub async fn show_section(&self, section: Section) -> Option<LoadOutcome> {
        let should_load = {
            let mut inner = self.inner.lock().await;
            inner.state.visible_section = section;
            inner.state.notes_visible() && inner.state.cache.is_empty()
        };

        if should_load {
            Some(self.load_notes().await)
        } else {
            None
        }
    }

    /// React to a store change notification.
    ///
    /// Reloads only while the notes section is visible; otherwise the
    /// notification is dropped.
    pub async fn handle_change(&self, event: ChangeEvent) -> Option<LoadOutcome> {
        let visible = self.inner.lock().await.state.notes_visible();
        if !visible {
            tracing::debug!("Ignoring {:?} change; notes section hidden", event.kind);
            return None;
        }
        Some(self.load_notes().await)
    }

    fn redraw(&self, inner: &mut Inner<V>) {
        self.draw_display(inner);
        Self::draw_stats(inner);
    }

    fn draw_display(&self, inner: &mut Inner<V>) {
        let content = render_notes(&inner.state, self.config.preview_chars);
        inner.view.show_display(&content);
    }

    fn draw_stats(inner: &mut Inner<V>) {
        let label = stats_label(inner.state.cache.len(), inner.state.filtered.len());
        inner.view.show_stats(&label);
    }

    fn close_reader_locked(inner: &mut Inner<V>) {
        if let Some(open) = inner.state.reader.take() {
            inner.view.remove_listener(open.escape_listener);
            inner.view.close_reader();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::render::EmptyState;
    use crate::store::{ChangeKind, InMemoryNoteStore, StoreOp};
    use crate::view::recording::RecordingView;

    async fn seeded() -> InMemoryNoteStore {
        InMemoryNoteStore::with_notes(&[
            NoteDraft::new("Old pier", "Fishing at dawn", "Sol"),
            NoteDraft::new("Night market", "Dumplings and lanterns", "Ivy"),
            NoteDraft::new("First snow", "Quiet streets <b>hi</b>", "Sol"),
        ])
        .await
    }

    fn controller(store: &InMemoryNoteStore, view: RecordingView) -> NotesController<RecordingView> {
        NotesController::new(
            Arc::new(store.clone()),
            view,
            ControllerConfig::default(),
        )
    }

    fn card_ids(content: Option<&DisplayContent>) -> Vec<String> {
        match content {
            Some(DisplayContent::Cards(cards)) => {
                cards.iter().map(|card| card.id.to_string()).collect()
            }
            other => panic!("expected cards, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_fills_cache_newest_first_and_renders() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());

        assert_eq!(controller.load_notes().await, LoadOutcome::Loaded(3));

        let state = controller.snapshot().await;
        assert!(!state.is_loading);
        assert_eq!(state.cache, state.filtered);
        controller
            .with_view(|view| {
                assert_eq!(view.displays[0], DisplayContent::Loading);
                assert_eq!(card_ids(view.last_display()), vec!["3", "2", "1"]);
                assert_eq!(view.last_stats(), Some("📊 3 stories"));
            })
            .await;
    }

    #[tokio::test]
    async fn load_failure_shows_error_and_keeps_cache() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        store.set_failing(StoreOp::List, true);
        assert_eq!(controller.load_notes().await, LoadOutcome::Failed);

        let state = controller.snapshot().await;
        assert!(!state.is_loading);
        assert_eq!(state.cache.len(), 3);
        controller
            .with_view(|view| {
                assert_eq!(view.last_display(), Some(&DisplayContent::LoadFailed));
            })
            .await;

        store.set_failing(StoreOp::List, false);
        assert_eq!(controller.load_notes().await, LoadOutcome::Loaded(3));
    }

    #[tokio::test]
    async fn overlapping_loads_hit_the_store_once() {
        let store = seeded().await;
        store.hold_listing();
        let controller = controller(&store, RecordingView::default());

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_notes().await }
        });
        while !controller.snapshot().await.is_loading {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.load_notes().await, LoadOutcome::Skipped);
        store.release_listing(1);
        assert_eq!(first.await.unwrap(), LoadOutcome::Loaded(3));
        assert_eq!(store.calls(StoreOp::List), 1);
        assert!(!controller.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn search_filters_and_updates_stats() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        controller.search_notes("  SOL ").await;
        controller
            .with_view(|view| {
                assert_eq!(card_ids(view.last_display()), vec!["3", "1"]);
                assert_eq!(view.last_stats(), Some("📊 Showing 2 of 3 stories"));
            })
            .await;

        controller.search_notes("volcano").await;
        controller
            .with_view(|view| {
                assert_eq!(
                    view.last_display(),
                    Some(&DisplayContent::Empty(EmptyState::NoMatches))
                );
            })
            .await;

        controller.search_notes("").await;
        let state = controller.snapshot().await;
        assert_eq!(state.filtered, state.cache);
    }

    #[tokio::test]
    async fn explicit_render_and_stats_reflect_current_state() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;
        controller.search_notes("night").await;
        let (displays, stats) = controller
            .with_view(|view| (view.displays.len(), view.stats.len()))
            .await;

        controller.render_notes().await;
        controller
            .with_view(|view| {
                assert_eq!(view.displays.len(), displays + 1);
                assert_eq!(view.stats.len(), stats);
                assert_eq!(card_ids(view.last_display()), vec!["2"]);
            })
            .await;

        controller.update_notes_stats().await;
        controller
            .with_view(|view| {
                assert_eq!(view.displays.len(), displays + 1);
                assert_eq!(view.stats.len(), stats + 1);
                assert_eq!(view.last_stats(), Some("📊 Showing 1 of 3 stories"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_search_drops_pending_keystroke() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        controller.search_input("pier").await;
        controller.search_notes("snow").await;
        assert_eq!(controller.search_deadline().await, None);

        tokio::time::advance(ControllerConfig::default().search_debounce * 2).await;
        assert!(!controller.fire_pending_search().await);
        assert_eq!(controller.snapshot().await.search_term, "snow");
    }

    #[tokio::test]
    async fn empty_store_renders_no_notes_state() {
        let store = InMemoryNoteStore::new();
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        controller
            .with_view(|view| {
                assert_eq!(
                    view.last_display(),
                    Some(&DisplayContent::Empty(EmptyState::NoNotes))
                );
                assert_eq!(view.last_stats(), Some("📊 No notes yet"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_applies_only_final_query() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;
        let renders_before = controller.with_view(|view| view.displays.len()).await;
        let start = Instant::now();

        for (offset, value) in [(0, "n"), (50, "ni"), (100, "nig"), (150, "night")] {
            tokio::time::sleep_until(start + std::time::Duration::from_millis(offset)).await;
            controller.search_input(value).await;
            assert!(!controller.fire_pending_search().await);
        }

        let deadline = controller.search_deadline().await.unwrap();
        let wait = deadline - start;
        assert!(wait >= std::time::Duration::from_millis(450));
        assert!(wait < std::time::Duration::from_millis(451));
        tokio::time::sleep_until(deadline).await;

        assert!(controller.fire_pending_search().await);
        assert!(!controller.fire_pending_search().await);

        let state = controller.snapshot().await;
        assert_eq!(state.search_term, "night");
        controller
            .with_view(|view| {
                assert_eq!(view.displays.len(), renders_before + 1);
                assert_eq!(card_ids(view.last_display()), vec!["2"]);
            })
            .await;
    }

    #[tokio::test]
    async fn submit_with_blank_field_makes_no_store_call() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());

        let outcome = controller
            .submit(NoteDraft::new("Title", "   ", "Me"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(store.total_calls(), 0);
        controller
            .with_view(|view| {
                assert_eq!(view.alerts, vec![VALIDATION_MESSAGE.to_string()]);
                assert!(view.busy_changes.is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn create_reloads_and_uses_store_assigned_fields() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;
        controller.new_story().await;

        let outcome = controller
            .submit(NoteDraft::new(" Harbor ", "Boats", " Lee "))
            .await;
        assert_eq!(outcome, SubmitOutcome::Saved);

        let stored = store.snapshot().await;
        let state = controller.snapshot().await;
        assert_eq!(state.cache, stored);
        assert_eq!(state.cache[0].id.as_str(), "4");
        assert_eq!(state.cache[0].title, "Harbor");
        assert_eq!(state.cache[0].author, "Lee");
        assert_eq!(state.cache[0].created_at, stored[0].created_at);
        assert_eq!(store.calls(StoreOp::Insert), 1);
        assert_eq!(store.calls(StoreOp::List), 2);
        assert!(!state.submitting);

        controller
            .with_view(|view| {
                assert_eq!(view.busy_changes, vec![true, false]);
                assert!(view.form.is_none());
                assert_eq!(view.last_stats(), Some("📊 4 stories"));
            })
            .await;
    }

    #[tokio::test]
    async fn edit_updates_target_and_clears_it() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        let id = NoteId::from(2);
        controller.edit_note(&id).await.unwrap();
        controller
            .with_view(|view| {
                assert_eq!(
                    view.form,
                    Some(NoteDraft::new(
                        "Night market",
                        "Dumplings and lanterns",
                        "Ivy"
                    ))
                );
            })
            .await;

        let outcome = controller
            .submit(NoteDraft::new("Night market", "Only dumplings", "Ivy"))
            .await;
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(store.calls(StoreOp::Update), 1);
        assert_eq!(store.calls(StoreOp::Insert), 0);

        let state = controller.snapshot().await;
        assert_eq!(state.editing, None);
        assert_eq!(state.find(&id).unwrap().body, "Only dumplings");
    }

    #[tokio::test]
    async fn failed_save_keeps_form_and_edit_target() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;
        controller.edit_note(&NoteId::from(1)).await.unwrap();
        store.set_failing(StoreOp::Update, true);

        let outcome = controller
            .submit(NoteDraft::new("Old pier", "Changed", "Sol"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        let state = controller.snapshot().await;
        assert_eq!(state.editing, Some(NoteId::from(1)));
        assert!(!state.submitting);
        assert_eq!(store.calls(StoreOp::List), 1);
        controller
            .with_view(|view| {
                assert!(view.form.is_some());
                assert_eq!(view.alerts, vec![SAVE_FAILED_MESSAGE.to_string()]);
                assert_eq!(view.busy_changes, vec![true, false]);
            })
            .await;
    }

    #[tokio::test]
    async fn edit_of_unknown_note_is_rejected() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        assert!(matches!(
            controller.edit_note(&NoteId::from(99)).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(controller.snapshot().await.editing, None);
    }

    #[tokio::test]
    async fn close_form_clears_edit_target() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;
        controller.edit_note(&NoteId::from(3)).await.unwrap();

        controller.close_form().await;

        assert_eq!(controller.snapshot().await.editing, None);
        controller
            .with_view(|view| assert!(view.form.is_none()))
            .await;
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::confirming(false));
        controller.load_notes().await;

        let outcome = controller.delete_note(&NoteId::from(1)).await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(store.calls(StoreOp::Delete), 0);
        controller
            .with_view(|view| {
                assert_eq!(view.confirms, vec![DELETE_CONFIRM_MESSAGE.to_string()]);
            })
            .await;
    }

    #[tokio::test]
    async fn confirmed_delete_reloads() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::confirming(true));
        controller.load_notes().await;

        let outcome = controller.delete_note(&NoteId::from(2)).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        let state = controller.snapshot().await;
        assert_eq!(state.cache.len(), 2);
        assert!(state.find(&NoteId::from(2)).is_none());
    }

    #[tokio::test]
    async fn failed_delete_leaves_cache_and_display() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::confirming(true));
        controller.load_notes().await;
        store.set_failing(StoreOp::Delete, true);
        let before = controller.snapshot().await;
        let displays_before = controller.with_view(|view| view.displays.clone()).await;

        let outcome = controller.delete_note(&NoteId::from(2)).await;

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert_eq!(controller.snapshot().await, before);
        controller
            .with_view(|view| {
                assert_eq!(view.displays, displays_before);
                assert_eq!(view.alerts, vec![DELETE_FAILED_MESSAGE.to_string()]);
            })
            .await;
    }

    #[tokio::test]
    async fn reader_escape_listener_is_detached_on_close() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        for _ in 0..3 {
            controller.open_reader(&NoteId::from(1)).await.unwrap();
            controller
                .with_view(|view| assert_eq!(view.listeners.len(), 1))
                .await;
            controller.handle_key(Key::Escape).await;
        }

        assert_eq!(controller.snapshot().await.reader, None);
        controller
            .with_view(|view| {
                assert!(view.listeners.is_empty());
                assert!(view.reader.is_none());
            })
            .await;
    }

    #[tokio::test]
    async fn opening_second_reader_replaces_first() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        controller.load_notes().await;

        controller.open_reader(&NoteId::from(1)).await.unwrap();
        controller.open_reader(&NoteId::from(3)).await.unwrap();

        let state = controller.snapshot().await;
        assert_eq!(state.reader.unwrap().note_id, NoteId::from(3));
        controller
            .with_view(|view| {
                assert_eq!(view.listeners.len(), 1);
                let reader = view.reader.as_ref().unwrap();
                assert_eq!(reader.title, "First snow");
                assert!(reader.to_html().contains("&lt;b&gt;hi&lt;/b&gt;"));
            })
            .await;
        controller.handle_key(Key::Other).await;
        assert!(controller.snapshot().await.reader.is_some());
    }

    #[tokio::test]
    async fn deleting_from_reader_closes_it() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::confirming(true));
        controller.load_notes().await;
        controller.open_reader(&NoteId::from(1)).await.unwrap();

        controller.delete_note(&NoteId::from(1)).await;

        assert_eq!(controller.snapshot().await.reader, None);
        controller
            .with_view(|view| assert!(view.listeners.is_empty()))
            .await;
    }

    #[tokio::test]
    async fn first_visit_to_notes_section_loads_once() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());

        assert_eq!(
            controller.show_section(Section::Other("gallery".into())).await,
            None
        );
        assert_eq!(store.calls(StoreOp::List), 0);

        assert_eq!(
            controller.show_section(Section::Notes).await,
            Some(LoadOutcome::Loaded(3))
        );
        assert_eq!(controller.show_section(Section::Notes).await, None);
        assert_eq!(store.calls(StoreOp::List), 1);
    }

    #[tokio::test]
    async fn change_notifications_reload_only_when_notes_visible() {
        let store = seeded().await;
        let controller = controller(&store, RecordingView::default());
        let event = ChangeEvent::new(ChangeKind::Insert);

        assert_eq!(controller.handle_change(event).await, None);
        assert_eq!(store.calls(StoreOp::List), 0);

        controller.show_section(Section::Notes).await;
        assert_eq!(
            controller.handle_change(event).await,
            Some(LoadOutcome::Loaded(3))
        );

        controller.show_section(Section::Other("about".into())).await;
        assert_eq!(controller.handle_change(event).await, None);
        assert_eq!(store.calls(StoreOp::List), 2);
    }
}
