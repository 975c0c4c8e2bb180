use std::io::Write;
use std::path::Path;

use tales_core::render::DisplayContent;

use crate::commands::common::{load_or_fail, TerminalController};
use crate::error::CliError;

pub async fn run_render<W: Write + Send + 'static>(
    controller: &TerminalController<W>,
    search: Option<&str>,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    load_or_fail(controller).await?;
    if let Some(query) = search {
        controller.search_notes(query).await;
    }

    let html = controller
        .with_view(|view| {
            view.latest_display()
                .map_or_else(|| DisplayContent::Loading.to_html(), DisplayContent::to_html)
        })
        .await;

    if let Some(path) = output_path {
        std::fs::write(path, &html)?;
        controller
            .with_view(|view| view.write_text(&path.display().to_string()))
            .await;
    } else {
        controller.with_view(|view| view.write_text(&html)).await;
    }

    Ok(())
}
