use std::io::Write;
use std::sync::Arc;

use tales_core::config::{ControllerConfig, StoreConfig};
use tales_core::controller::{LoadOutcome, NotesController};
use tales_core::render::LOAD_FAILED_MESSAGE;
use tales_core::store::{NoteStore, RestNoteStore};
use tales_core::NoteId;

use crate::error::CliError;
use crate::view::TerminalView;

/// Controller drawing into a terminal view over `W`
pub type TerminalController<W> = NotesController<TerminalView<W>>;

pub fn open_rest_store(config: &StoreConfig) -> Result<Arc<dyn NoteStore>, CliError> {
    Ok(Arc::new(RestNoteStore::new(config)?))
}

pub fn build_controller<W: Write + Send + 'static>(
    store: Arc<dyn NoteStore>,
    out: W,
    live: bool,
    confirm_answer: bool,
    config: ControllerConfig,
) -> TerminalController<W> {
    NotesController::new(store, TerminalView::new(out, live, confirm_answer), config)
}

/// Fill the controller cache, failing when the store is unreachable.
pub async fn load_or_fail<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
) -> Result<usize, CliError> {
    match controller.load_notes().await {
        LoadOutcome::Loaded(count) => Ok(count),
        LoadOutcome::Skipped => Ok(controller.snapshot().await.cache.len()),
        LoadOutcome::Failed => Err(CliError::LoadFailed(LOAD_FAILED_MESSAGE.to_string())),
    }
}

pub fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    Ok(raw.parse::<NoteId>()?)
}

/// Look up `id` in the loaded cache.
pub async fn require_cached<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    id: &NoteId,
) -> Result<(), CliError> {
    if controller.snapshot().await.find(id).is_some() {
        Ok(())
    } else {
        Err(CliError::NoteNotFound(id.to_string()))
    }
}
