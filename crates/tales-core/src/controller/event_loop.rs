//! Single event loop driving the controller.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::{NotesController, Section};
use crate::debounce::sleep_until_deadline;
use crate::models::{NoteDraft, NoteId};
use crate::store::ChangeEvent;
use crate::view::{Key, NotesView};

/// User interactions delivered by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowSection(Section),
    /// Raw value of the search field after a keystroke
    SearchInput(String),
    NewStory,
    EditNote(NoteId),
    CloseForm,
    Submit(NoteDraft),
    DeleteNote(NoteId),
    OpenReader(NoteId),
    CloseReader,
    Key(Key),
    Reload,
}

/// Service UI events, change notifications and the search debounce until the
/// UI channel closes.
///
/// Events that only touch local state run inline so they keep their order.
/// Store-bound work is spawned, so a slow request never holds up the loop;
/// spawned work is awaited before returning.
pub async fn run<V: NotesView + 'static>(
    controller: NotesController<V>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut changes: mpsc::Receiver<ChangeEvent>,
) {
    let mut tasks = JoinSet::new();
    let mut changes_open = true;

    loop {
        let deadline = controller.search_deadline().await;

        tokio::select! {
            event = ui_events.recv() => {
                let Some(event) = event else {
                    break;
                };
                dispatch(&controller, &mut tasks, event).await;
            }
            change = changes.recv(), if changes_open => {
                if let Some(change) = change {
                    let controller = controller.clone();
                    tasks.spawn(async move {
                        controller.handle_change(change).await;
                    });
                } else {
                    tracing::debug!("Change feed closed");
                    changes_open = false;
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(error) = joined {
                    tracing::warn!("Controller task failed: {}", error);
                }
            }
            () = sleep_until_deadline(deadline) => {
                controller.fire_pending_search().await;
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(error) = joined {
            tracing::warn!("Controller task failed: {}", error);
        }
    }
}

async fn dispatch<V: NotesView + 'static>(
    controller: &NotesController<V>,
    tasks: &mut JoinSet<()>,
    event: UiEvent,
) {
    match event {
        UiEvent::SearchInput(value) => controller.search_input(&value).await,
        UiEvent::NewStory => controller.new_story().await,
        UiEvent::EditNote(id) => {
            if let Err(error) = controller.edit_note(&id).await {
                tracing::warn!("Cannot edit note: {}", error);
            }
        }
        UiEvent::CloseForm => controller.close_form().await,
        UiEvent::OpenReader(id) => {
            if let Err(error) = controller.open_reader(&id).await {
                tracing::warn!("Cannot open note: {}", error);
            }
        }
        UiEvent::CloseReader => controller.close_reader().await,
        UiEvent::Key(key) => controller.handle_key(key).await,
        UiEvent::ShowSection(section) => {
            let controller = controller.clone();
            tasks.spawn(async move {
                controller.show_section(section).await;
            });
        }
        UiEvent::Submit(draft) => {
            let controller = controller.clone();
            tasks.spawn(async move {
                controller.submit(draft).await;
            });
        }
        UiEvent::DeleteNote(id) => {
            let controller = controller.clone();
            tasks.spawn(async move {
                controller.delete_note(&id).await;
            });
        }
        UiEvent::Reload => {
            let controller = controller.clone();
            tasks.spawn(async move {
                controller.load_notes().await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::ControllerConfig;
    use crate::store::{InMemoryNoteStore, NoteStore, StoreOp};
    use crate::view::recording::RecordingView;

    async fn setup() -> (InMemoryNoteStore, NotesController<RecordingView>) {
        let store = InMemoryNoteStore::with_notes(&[
            NoteDraft::new("Tea", "Green and bitter", "Ona"),
            NoteDraft::new("Lanterns", "Dumplings at the fair", "Pim"),
        ])
        .await;
        let controller = NotesController::new(
            Arc::new(store.clone()),
            RecordingView::confirming(true),
            ControllerConfig::default(),
        );
        (store, controller)
    }

    #[tokio::test(start_paused = true)]
    async fn loop_debounces_search_and_reloads_on_change() {
        let (store, controller) = setup().await;
        let changes = store.subscribe().await;
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(controller.clone(), rx, changes));

        tx.send(UiEvent::ShowSection(Section::Notes)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.snapshot().await.cache.len(), 2);

        for value in ["d", "du", "dump"] {
            tx.send(UiEvent::SearchInput(value.to_string()))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(controller.snapshot().await.search_term, "");

        tokio::time::sleep(Duration::from_millis(300)).await;
        let state = controller.snapshot().await;
        assert_eq!(state.search_term, "dump");
        assert_eq!(state.filtered.len(), 1);

        store
            .insert(&NoteDraft::new("Dumpling recipe", "Flour, water", "Ona"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let state = controller.snapshot().await;
        assert_eq!(state.cache.len(), 3);
        assert_eq!(state.filtered.len(), 2);

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn loop_routes_reader_form_and_delete_events() {
        let (store, controller) = setup().await;
        let (_change_tx, changes) = mpsc::channel(1);
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(controller.clone(), rx, changes));

        tx.send(UiEvent::Reload).await.unwrap();
        while controller.snapshot().await.cache.len() < 2 {
            tokio::task::yield_now().await;
        }
        tx.send(UiEvent::OpenReader(NoteId::from(1))).await.unwrap();
        tx.send(UiEvent::Key(Key::Other)).await.unwrap();
        tx.send(UiEvent::CloseReader).await.unwrap();
        tx.send(UiEvent::OpenReader(NoteId::from(1))).await.unwrap();
        tx.send(UiEvent::Key(Key::Escape)).await.unwrap();
        tx.send(UiEvent::EditNote(NoteId::from(2))).await.unwrap();
        tx.send(UiEvent::CloseForm).await.unwrap();
        tx.send(UiEvent::DeleteNote(NoteId::from(1))).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.calls(StoreOp::Delete), 1);
        assert_eq!(store.list_newest_first().await.unwrap().len(), 1);
        let state = controller.snapshot().await;
        assert_eq!(state.reader, None);
        assert_eq!(state.editing, None);
        controller
            .with_view(|view| assert!(view.listeners.is_empty()))
            .await;
    }

    #[tokio::test]
    async fn loop_submits_new_story() {
        let (store, controller) = setup().await;
        let (_change_tx, changes) = mpsc::channel(1);
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(controller.clone(), rx, changes));

        tx.send(UiEvent::NewStory).await.unwrap();
        tx.send(UiEvent::Submit(NoteDraft::new("Rain", "All day", "Ona")))
            .await
            .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.calls(StoreOp::Insert), 1);
        let state = controller.snapshot().await;
        assert_eq!(state.cache.len(), 3);
        assert_eq!(state.cache[0].title, "Rain");
    }
}
