//! Terminal implementation of the notes view.

use std::collections::HashSet;
use std::io::Write;

use tales_core::render::{DisplayContent, ReaderView, LOADING_MESSAGE, LOAD_FAILED_MESSAGE};
use tales_core::view::{ListenerId, NotesView};
use tales_core::NoteDraft;

/// Writes display updates to `out`.
///
/// A live view prints every update as it happens. Otherwise only the reader
/// is printed immediately and the latest display and stats are kept for
/// [`TerminalView::flush_latest`]. Confirmations are answered with
/// `confirm_answer`; interactive prompts happen before the controller asks.
pub struct TerminalView<W> {
    out: W,
    live: bool,
    confirm_answer: bool,
    latest_display: Option<DisplayContent>,
    latest_stats: Option<String>,
    listeners: HashSet<ListenerId>,
    next_listener: u64,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, live: bool, confirm_answer: bool) -> Self {
        Self {
            out,
            live,
            confirm_answer,
            latest_display: None,
            latest_stats: None,
            listeners: HashSet::new(),
            next_listener: 0,
        }
    }

    pub const fn latest_display(&self) -> Option<&DisplayContent> {
        self.latest_display.as_ref()
    }

    /// Print the most recent display content followed by the stats label.
    pub fn flush_latest(&mut self) {
        let mut lines = self
            .latest_display
            .as_ref()
            .map(display_lines)
            .unwrap_or_default();
        if let Some(stats) = &self.latest_stats {
            lines.push(single_line(stats));
        }
        self.write_lines(&lines);
    }

    /// Command output that is not part of the notes display.
    pub fn write_text(&mut self, text: &str) {
        let lines = text.lines().map(str::to_string).collect::<Vec<_>>();
        self.write_lines(&lines);
    }

    fn write_lines(&mut self, lines: &[String]) {
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            tracing::warn!("Failed to write to terminal: {}", error);
        }
    }
}

impl<W: Write + Send> NotesView for TerminalView<W> {
    fn show_display(&mut self, content: &DisplayContent) {
        self.latest_display = Some(content.clone());
        if self.live {
            self.write_lines(&display_lines(content));
        }
    }

    fn show_stats(&mut self, label: &str) {
        self.latest_stats = Some(label.to_string());
        if self.live {
            self.write_lines(&[single_line(label)]);
        }
    }

    fn show_form(&mut self, values: &NoteDraft) {
        if self.live {
            let line = if values.title.is_empty() {
                "✏️ New story".to_string()
            } else {
                format!("✏️ Editing \"{}\"", single_line(&values.title))
            };
            self.write_lines(&[line]);
        }
    }

    fn hide_form(&mut self) {}

    fn set_submit_busy(&mut self, busy: bool) {
        if busy && self.live {
            self.write_lines(&["Saving...".to_string()]);
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", single_line(message));
    }

    fn confirm(&mut self, message: &str) -> bool {
        tracing::debug!("Confirmation {:?} answered {}", message, self.confirm_answer);
        self.confirm_answer
    }

    fn show_reader(&mut self, reader: &ReaderView) {
        self.write_lines(&reader_lines(reader));
    }

    fn close_reader(&mut self) {
        if self.live {
            self.write_lines(&["(closed)".to_string()]);
        }
    }

    fn add_escape_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

/// Plain-text rendering of the display region.
pub fn display_lines(content: &DisplayContent) -> Vec<String> {
    match content {
        DisplayContent::Loading => vec![LOADING_MESSAGE.to_string()],
        DisplayContent::LoadFailed => vec![format!("❌ {LOAD_FAILED_MESSAGE}")],
        DisplayContent::Empty(empty) => vec![format!("{} {}", empty.icon(), empty.message())],
        DisplayContent::Cards(cards) => cards
            .iter()
            .flat_map(|card| {
                [
                    format!(
                        "#{:<5} {}  (by {})",
                        single_line(card.id.as_str()),
                        single_line(&card.title),
                        single_line(&card.author)
                    ),
                    format!("       {}", single_line(&card.preview)),
                ]
            })
            .collect(),
    }
}

pub fn reader_lines(reader: &ReaderView) -> Vec<String> {
    let mut lines = vec![
        single_line(&reader.title),
        format!(
            "by {} · {}",
            single_line(&reader.author),
            single_line(&reader.date)
        ),
        String::new(),
    ];
    lines.extend(multi_line(&reader.body).lines().map(str::to_string));
    lines.push(String::new());
    lines.push(format!("(#{}) /close to return", single_line(reader.id.as_str())));
    lines
}

/// Collapse whitespace controls to spaces and drop every other control
/// character, so stored text cannot move the cursor or recolor the terminal.
pub fn single_line(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}

/// Like [`single_line`] but keeps line breaks.
pub fn multi_line(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}
