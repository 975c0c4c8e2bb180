use std::io::Write;

use crate::commands::common::{load_or_fail, parse_note_id, require_cached, TerminalController};
use crate::error::CliError;

pub async fn run_show<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    id: &str,
) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    load_or_fail(controller).await?;
    require_cached(controller, &id).await?;

    controller.open_reader(&id).await?;
    controller.close_reader().await;
    Ok(())
}
