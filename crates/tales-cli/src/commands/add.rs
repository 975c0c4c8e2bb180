use std::io::Write;

use tales_core::controller::{SubmitOutcome, SAVE_FAILED_MESSAGE, VALIDATION_MESSAGE};
use tales_core::NoteDraft;

use crate::commands::common::TerminalController;
use crate::error::CliError;

pub async fn run_add<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    draft: NoteDraft,
) -> Result<(), CliError> {
    controller.new_story().await;
    submit_and_show(controller, draft).await
}

/// Submit the form and print the refreshed list.
pub async fn submit_and_show<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    draft: NoteDraft,
) -> Result<(), CliError> {
    match controller.submit(draft).await {
        SubmitOutcome::Saved => {
            controller.with_view(|view| view.flush_latest()).await;
            Ok(())
        }
        SubmitOutcome::Rejected => Err(CliError::Rejected(VALIDATION_MESSAGE.to_string())),
        SubmitOutcome::Busy | SubmitOutcome::Failed => {
            Err(CliError::SaveFailed(SAVE_FAILED_MESSAGE.to_string()))
        }
    }
}
