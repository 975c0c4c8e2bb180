use std::io::Write;

use crate::commands::common::{load_or_fail, TerminalController};
use crate::error::CliError;

pub async fn run_list<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    search: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    load_or_fail(controller).await?;
    if let Some(query) = search {
        controller.search_notes(query).await;
    }

    if as_json {
        let notes = controller.snapshot().await.filtered;
        let json = serde_json::to_string_pretty(&notes)?;
        controller.with_view(|view| view.write_text(&json)).await;
    } else {
        controller.with_view(|view| view.flush_latest()).await;
    }

    Ok(())
}
