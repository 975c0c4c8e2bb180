use std::io::Write;

use tales_core::NoteDraft;

use crate::commands::add::submit_and_show;
use crate::commands::common::{load_or_fail, parse_note_id, require_cached, TerminalController};
use crate::error::CliError;

/// Field overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl EditFields {
    /// Overlay the given fields onto the stored values.
    pub fn apply(self, current: NoteDraft) -> NoteDraft {
        NoteDraft {
            title: self.title.unwrap_or(current.title),
            body: self.body.unwrap_or(current.body),
            author: self.author.unwrap_or(current.author),
        }
    }
}

pub async fn run_edit<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    id: &str,
    fields: EditFields,
) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    load_or_fail(controller).await?;
    require_cached(controller, &id).await?;

    controller.edit_note(&id).await?;
    let current = controller
        .snapshot()
        .await
        .find(&id)
        .map(tales_core::Note::to_draft)
        .ok_or_else(|| CliError::NoteNotFound(id.to_string()))?;

    submit_and_show(controller, fields.apply(current)).await
}
