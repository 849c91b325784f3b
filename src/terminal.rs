//! Interactive terminal front end for the chat widget.
//!
//! Each stdin line is typed into the input and submitted with Enter, except
//! for a few slash commands. Replies arriving while the user types are
//! printed as soon as their completion is drained. When input ends, replies
//! to messages already sent are still awaited; `/quit` leaves at once.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::endpoint::ChatEndpoint;
use crate::widget::message::Sender;
use crate::widget::surface::{Surface, TerminalSurface};
use crate::widget::{ChatWidget, Completion, Completions, Key, SubmitOutcome, WidgetOptions};

pub const HELP: &str = "Type a message and press Enter. /toggle shows or hides the chat, /help repeats this, /quit exits.";

/// One line of user input, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Toggle,
    Help,
    Quit,
    Submit(&'a str),
}

#[must_use]
pub fn parse_line(line: &str) -> Command<'_> {
    match line.trim() {
        "/toggle" => Command::Toggle,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Submit(line),
    }
}

/// Apply one input line to the widget. Returns `false` when the user quits.
///
/// Typing into a closed chat opens it first, the way focusing the input
/// would.
pub fn apply_line<S: Surface>(widget: &mut ChatWidget<S>, line: &str) -> bool {
    match parse_line(line) {
        Command::Quit => return false,
        Command::Toggle => {
            widget.toggle_panel();
        }
        Command::Help => widget.show_notice(HELP),
        Command::Submit(text) => {
            if text.trim().is_empty() {
                return true;
            }
            if !widget.panel().is_open() {
                widget.toggle_panel();
            }
            widget.set_input(text);
            if widget.handle_key(Key::Enter) == Some(SubmitOutcome::Busy) {
                widget.render_message(Sender::System, "Still waiting for the previous reply.");
            }
        }
    }
    true
}

/// Decode and clear one buffered line. Bytes that are not UTF-8 become U+FFFD.
fn take_line(buf: &mut Vec<u8>) -> String {
    let line = String::from_utf8_lossy(&buf[..]).trim_end_matches(['\n', '\r']).to_owned();
    buf.clear();
    line
}

enum Event {
    Read(std::io::Result<usize>),
    Completion(Completion),
    Closed,
}

/// Feed `input` to the widget line by line while applying completions.
///
/// On end of input, keeps draining completions until no `/chat` request is
/// outstanding. Returns immediately on `/quit`.
///
/// # Errors
///
/// Returns an error if reading `input` fails.
pub async fn drive<S, R>(widget: &mut ChatWidget<S>, completions: &mut Completions, mut input: R) -> std::io::Result<()>
where
    S: Surface,
    R: AsyncBufRead + Unpin,
{
    // Survives select! cancellation: read_until appends partial reads here.
    let mut buf = Vec::new();
    let mut reading = true;

    loop {
        if !reading && widget.in_flight() == 0 {
            return Ok(());
        }

        let event = tokio::select! {
            read = input.read_until(b'\n', &mut buf), if reading => Event::Read(read),
            Some(completion) = completions.recv() => Event::Completion(completion),
            else => Event::Closed,
        };

        match event {
            Event::Read(read) => {
                if read? == 0 {
                    reading = false;
                    debug!(in_flight = widget.in_flight(), "terminal: input closed");
                    if buf.is_empty() {
                        continue;
                    }
                }
                let line = take_line(&mut buf);
                if !apply_line(widget, &line) {
                    return Ok(());
                }
            }
            Event::Completion(completion) => widget.apply_completion(completion),
            Event::Closed => return Ok(()),
        }
    }
}

/// Run the widget on stdin/stdout until EOF or `/quit`.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn run(endpoint: Arc<dyn ChatEndpoint>, options: WidgetOptions) -> std::io::Result<()> {
    let surface = TerminalSurface::new(std::io::stdout());
    let (mut widget, mut completions) = ChatWidget::new(endpoint, surface, options);
    widget.toggle_panel();
    widget.show_notice(HELP);

    drive(&mut widget, &mut completions, BufReader::new(tokio::io::stdin())).await
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
