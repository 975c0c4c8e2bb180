use std::io::{self, Write};

use tales_core::controller::{run, Section, UiEvent};
use tales_core::store::ChangeEvent;
use tales_core::view::Key;
use tales_core::{NoteDraft, NoteId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::commands::common::TerminalController;
use crate::error::CliError;

const UI_BUFFER: usize = 64;

/// One line typed in watch mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Events(Vec<UiEvent>),
    Quit,
    Invalid(String),
}

/// Map a typed line to UI events.
///
/// Plain text is search input; lines starting with `/` are commands.
pub fn parse_watch_input(line: &str) -> WatchInput {
    let Some(command) = line.trim().strip_prefix('/') else {
        return WatchInput::Events(vec![UiEvent::SearchInput(line.to_string())]);
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));

    match name {
        "quit" | "q" => WatchInput::Quit,
        "close" => WatchInput::Events(vec![UiEvent::Key(Key::Escape)]),
        "clear" => WatchInput::Events(vec![UiEvent::SearchInput(String::new())]),
        "reload" => WatchInput::Events(vec![UiEvent::Reload]),
        "open" => with_note_id(rest, "/open ID", UiEvent::OpenReader),
        "delete" => with_note_id(rest, "/delete ID", UiEvent::DeleteNote),
        "add" => parse_add(rest),
        other => WatchInput::Invalid(format!("Unknown command /{other}")),
    }
}

fn with_note_id(raw: &str, usage: &str, event: fn(NoteId) -> UiEvent) -> WatchInput {
    raw.parse::<NoteId>().map_or_else(
        |_| WatchInput::Invalid(format!("Usage: {usage}")),
        |id| WatchInput::Events(vec![event(id)]),
    )
}

fn parse_add(raw: &str) -> WatchInput {
    let parts = raw.split('|').map(str::trim).collect::<Vec<_>>();
    let [title, body, author] = parts.as_slice() else {
        return WatchInput::Invalid("Usage: /add TITLE | BODY | AUTHOR".to_string());
    };
    WatchInput::Events(vec![
        UiEvent::NewStory,
        UiEvent::Submit(NoteDraft::new(*title, *body, *author)),
    ])
}

/// Drive the controller from typed lines until `/quit` or end of input.
pub async fn run_watch<W, R>(
    controller: &TerminalController<W>,
    changes: Option<mpsc::Receiver<ChangeEvent>>,
    input: R,
) -> Result<(), CliError>
where
    W: Write + Send + 'static,
    R: AsyncBufRead + Unpin,
{
    let (ui_tx, ui_rx) = mpsc::channel(UI_BUFFER);
    let changes = changes.unwrap_or_else(|| mpsc::channel(1).1);
    let event_loop = tokio::spawn(run(controller.clone(), ui_rx, changes));

    if ui_tx.send(UiEvent::ShowSection(Section::Notes)).await.is_ok() {
        let mut lines = input.lines();
        'input: while let Some(line) = lines.next_line().await? {
            match parse_watch_input(&line) {
                WatchInput::Quit => break,
                WatchInput::Invalid(message) => eprintln!("{message}"),
                WatchInput::Events(events) => {
                    for event in events {
                        if ui_tx.send(event).await.is_err() {
                            break 'input;
                        }
                    }
                }
            }
        }
    }

    drop(ui_tx);
    event_loop.await.map_err(io::Error::other)?;
    Ok(())
}
