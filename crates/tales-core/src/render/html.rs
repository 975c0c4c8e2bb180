//! HTML rendering of display content.
//!
//! User-supplied strings are encoded with `html_escape` so note content is
//! always inert text. Actions are exposed as `data-action`/`data-note-id`
//! attributes rather than inline handlers.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{DisplayContent, NoteCard, ReaderView, LOADING_MESSAGE, LOAD_FAILED_MESSAGE};

fn empty_state_html(icon: &str, message: &str) -> String {
    format!(
        "<div class=\"empty-state\">\n  <div class=\"empty-state-icon\">{icon}</div>\n  <p>{message}</p>\n</div>\n"
    )
}

fn card_html(output: &mut String, card: &NoteCard) {
    let id = encode_double_quoted_attribute(card.id.as_str());
    let _ = writeln!(output, "<div class=\"note-card\" data-action=\"open\" data-note-id=\"{id}\">");
    let _ = writeln!(output, "  <div class=\"note-content\">");
    let _ = writeln!(
        output,
        "    <h3 class=\"note-title\">{}</h3>",
        encode_text(&card.title)
    );
    let _ = writeln!(
        output,
        "    <p class=\"note-preview\">{}</p>",
        encode_text(&card.preview)
    );
    let _ = writeln!(output, "    <div class=\"note-meta\">");
    let _ = writeln!(
        output,
        "      <span class=\"note-author\">by {}</span>",
        encode_text(&card.author)
    );
    let _ = writeln!(output, "      <div class=\"note-actions\">");
    let _ = writeln!(
        output,
        "        <button class=\"note-btn edit\" data-action=\"edit\" data-note-id=\"{id}\" title=\"Edit\">✏️</button>"
    );
    let _ = writeln!(
        output,
        "        <button class=\"note-btn delete\" data-action=\"delete\" data-note-id=\"{id}\" title=\"Delete\">🗑️</button>"
    );
    let _ = writeln!(output, "      </div>");
    let _ = writeln!(output, "    </div>");
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "</div>");
}

impl DisplayContent {
    /// Markup that replaces the display region's content.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Loading => format!("<div class=\"loading\">{LOADING_MESSAGE}</div>\n"),
            Self::LoadFailed => empty_state_html("❌", LOAD_FAILED_MESSAGE),
            Self::Empty(empty) => empty_state_html(empty.icon(), empty.message()),
            Self::Cards(cards) => {
                let mut output = String::new();
                for card in cards {
                    card_html(&mut output, card);
                }
                output
            }
        }
    }
}

impl ReaderView {
    /// Markup of the reader overlay.
    #[must_use]
    pub fn to_html(&self) -> String {
        let id = encode_double_quoted_attribute(self.id.as_str());
        let mut output = String::new();
        let _ = writeln!(output, "<div class=\"note-reader-overlay\" data-action=\"close\">");
        let _ = writeln!(output, "  <div class=\"note-reader-content\">");
        let _ = writeln!(
            output,
            "    <button class=\"note-reader-close\" data-action=\"close\">×</button>"
        );
        let _ = writeln!(output, "    <div class=\"note-reader-header\">");
        let _ = writeln!(
            output,
            "      <h2 class=\"note-reader-title\">{}</h2>",
            encode_text(&self.title)
        );
        let _ = writeln!(output, "      <div class=\"note-reader-meta\">");
        let _ = writeln!(
            output,
            "        <span class=\"note-reader-author\">by {}</span>",
            encode_text(&self.author)
        );
        let _ = writeln!(output, "        <span>{}</span>", encode_text(&self.date));
        let _ = writeln!(output, "      </div>");
        let _ = writeln!(output, "    </div>");
        let _ = writeln!(
            output,
            "    <div class=\"note-reader-body\">{}</div>",
            encode_text(&self.body)
        );
        let _ = writeln!(output, "    <div class=\"note-reader-actions\">");
        let _ = writeln!(
            output,
            "      <button class=\"reader-btn edit\" data-action=\"edit\" data-note-id=\"{id}\">✏️ Edit</button>"
        );
        let _ = writeln!(
            output,
            "      <button class=\"reader-btn delete\" data-action=\"delete\" data-note-id=\"{id}\">🗑️ Delete</button>"
        );
        let _ = writeln!(output, "    </div>");
        let _ = writeln!(output, "  </div>");
        let _ = writeln!(output, "</div>");
        output
    }
}
