use std::io::{self, BufRead, Write};

use tales_core::controller::{DeleteOutcome, DELETE_CONFIRM_MESSAGE, DELETE_FAILED_MESSAGE};

use crate::commands::common::{load_or_fail, parse_note_id, require_cached, TerminalController};
use crate::error::CliError;
use crate::view::single_line;

/// Delete note `id`.
///
/// With `confirm_input`, the user is asked on stderr first and the answer is
/// read from that input on a blocking thread, before the controller is touched.
pub async fn run_delete<W, R>(
    controller: &TerminalController<W>,
    id: &str,
    confirm_input: Option<R>,
) -> Result<(), CliError>
where
    W: Write + Send + 'static,
    R: BufRead + Send + 'static,
{
    let id = parse_note_id(id)?;
    load_or_fail(controller).await?;
    require_cached(controller, &id).await?;

    if let Some(input) = confirm_input {
        let confirmed = tokio::task::spawn_blocking(move || prompt_yes_no(input))
            .await
            .map_err(io::Error::other)??;
        if !confirmed {
            eprintln!("Cancelled");
            return Ok(());
        }
    }

    match controller.delete_note(&id).await {
        DeleteOutcome::Deleted => {
            controller.with_view(|view| view.write_text(id.as_str())).await;
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            eprintln!("Cancelled");
            Ok(())
        }
        DeleteOutcome::Failed => Err(CliError::DeleteFailed(DELETE_FAILED_MESSAGE.to_string())),
    }
}

fn prompt_yes_no(input: impl BufRead) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", single_line(DELETE_CONFIRM_MESSAGE))?;
    stderr.flush()?;
    read_yes_no(input)
}

/// Read one answer line; only `y` or `yes` (any case) confirms.
pub fn read_yes_no(mut input: impl BufRead) -> io::Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
