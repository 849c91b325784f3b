//! Rendering surfaces for the chat widget.
//!
//! DESIGN
//! ======
//! The widget owns its log and pushes every visible change through a
//! `Surface`: panel visibility, appended entries, the input field value and
//! the scroll position of the messages area. `BufferSurface` keeps all of it
//! in memory (headless use and tests); `TerminalSurface` writes to any
//! `io::Write`, normally stdout.

use std::io::Write;

use tracing::warn;

use super::message::Message;

/// Visual collaborator of [`super::ChatWidget`].
pub trait Surface {
    /// Show or hide the panel container.
    fn set_panel_visible(&mut self, visible: bool);

    /// Append a rendered entry to the messages area.
    fn append_entry(&mut self, message: &Message);

    /// Mirror the input field value.
    fn set_input(&mut self, text: &str);

    /// Scroll the messages area so the newest entry is visible.
    fn scroll_to_end(&mut self);

    /// Show transient guidance that is not part of the conversation.
    fn show_notice(&mut self, text: &str);
}

// =============================================================================
// BUFFER SURFACE
// =============================================================================

/// In-memory surface with a fixed-height viewport over the rendered lines.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    lines: Vec<String>,
    notices: Vec<String>,
    visible: bool,
    input: String,
    viewport_rows: usize,
    scroll_top: usize,
}

impl BufferSurface {
    #[must_use]
    pub fn new(viewport_rows: usize) -> Self {
        Self { lines: Vec::new(), notices: Vec::new(), visible: false, input: String::new(), viewport_rows, scroll_top: 0 }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current scroll offset in rows.
    #[must_use]
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Largest valid scroll offset: total rows minus the viewport height.
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_rows)
    }

    /// Move the viewport; offsets past the end clamp to [`Self::max_scroll`].
    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll_top = offset.min(self.max_scroll());
    }

    /// Lines currently inside the viewport.
    #[must_use]
    pub fn visible_lines(&self) -> &[String] {
        let end = (self.scroll_top + self.viewport_rows).min(self.lines.len());
        &self.lines[self.scroll_top..end]
    }
}

impl Default for BufferSurface {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Surface for BufferSurface {
    fn set_panel_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn append_entry(&mut self, message: &Message) {
        self.lines.push(message.to_string());
    }

    fn set_input(&mut self, text: &str) {
        text.clone_into(&mut self.input);
    }

    fn scroll_to_end(&mut self) {
        self.scroll_to(self.lines.len());
    }

    fn show_notice(&mut self, text: &str) {
        self.notices.push(text.to_owned());
    }
}

// =============================================================================
// TERMINAL SURFACE
// =============================================================================

/// Line-oriented surface for a terminal.
///
/// Entries appended while the panel is hidden are held back and printed when
/// it is shown again, so the transcript on screen always matches the log.
pub struct TerminalSurface<W: Write> {
    out: W,
    visible: bool,
    held: Vec<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, visible: false, held: Vec::new() }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "terminal: write failed");
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_panel_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.write_line("-- chat open --");
            for line in std::mem::take(&mut self.held) {
                self.write_line(&line);
            }
        } else {
            self.write_line("-- chat closed --");
        }
        self.scroll_to_end();
    }

    fn append_entry(&mut self, message: &Message) {
        let line = message.to_string();
        if self.visible {
            self.write_line(&line);
        } else {
            self.held.push(line);
        }
    }

    fn set_input(&mut self, _text: &str) {
        // The terminal line editor owns the input echo.
    }

    fn scroll_to_end(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "terminal: flush failed");
        }
    }

    fn show_notice(&mut self, text: &str) {
        self.write_line(&format!("-- {text}"));
        self.scroll_to_end();
    }
}

#[cfg(test)]
#[path = "surface_test.rs"]
mod tests;
