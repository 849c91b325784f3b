//! Chat widget: toggleable panel, input buffer and append-only log.
//!
//! DESIGN
//! ======
//! `ChatWidget` owns every piece of widget state: panel visibility, the
//! input buffer, the log and the surface it renders to. Network calls run in
//! spawned tasks and report back as `Completion`s over an unbounded channel;
//! the owner drains [`Completions`] and feeds each one to
//! [`ChatWidget::apply_completion`]. The log is only ever mutated by the
//! owning task, whatever runtime flavour the tasks run on.
//!
//! Replies are applied in arrival order. Under `SubmitPolicy::Concurrent`
//! overlapping requests may therefore answer out of submission order.

pub mod message;
pub mod panel;
pub mod surface;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::endpoint::{ChatEndpoint, EndpointError};
use crate::protocol::ChatReply;
use message::{Message, MessageLog, Sender};
use panel::PanelState;
use surface::Surface;

pub const DEFAULT_TICKET_POLL_SECS: u64 = 5;
pub const DEFAULT_TICKET_POLL_LIMIT: u32 = 120;

// =============================================================================
// TYPES
// =============================================================================

/// Identifies one submitted message and its eventual reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// What to do with a submission while another request is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Send immediately; any number of requests may overlap.
    #[default]
    Concurrent,
    /// Reject submissions until the outstanding request completes.
    SingleFlight,
}

/// Result of [`ChatWidget::submit_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The trimmed input was empty; nothing happened.
    Empty,
    /// `SingleFlight` is active and a request is outstanding.
    Busy,
    /// The message was logged and the request spawned.
    Sent(RequestId),
}

/// Keyboard input routed to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub policy: SubmitPolicy,
    pub ticket_poll_interval: Duration,
    pub ticket_poll_limit: u32,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            policy: SubmitPolicy::default(),
            ticket_poll_interval: Duration::from_secs(DEFAULT_TICKET_POLL_SECS),
            ticket_poll_limit: DEFAULT_TICKET_POLL_LIMIT,
        }
    }
}

/// A finished background operation, waiting to be applied to the log.
#[derive(Debug)]
pub enum Completion {
    /// `POST /chat` returned.
    Reply { request: RequestId, result: Result<ChatReply, EndpointError> },
    /// An admin answered a handed-off ticket.
    TicketAnswered { ticket_id: String, reply: String },
    /// Polling a ticket failed and was abandoned.
    TicketFailed { ticket_id: String, error: EndpointError },
    /// The poll limit ran out before an admin answered.
    TicketExpired { ticket_id: String },
}

/// Receiving half of the widget's completion channel.
pub struct Completions {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Completions {
    /// Wait for the next completion. Never returns `None` while the widget lives.
    pub async fn recv(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`Self::recv`].
    pub fn try_recv(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct ChatWidget<S: Surface> {
    endpoint: Arc<dyn ChatEndpoint>,
    surface: S,
    panel: PanelState,
    input: String,
    log: MessageLog,
    options: WidgetOptions,
    in_flight: HashSet<RequestId>,
    next_request: u64,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<S: Surface> ChatWidget<S> {
    /// Build a widget and the completion stream its owner must drain.
    pub fn new(endpoint: Arc<dyn ChatEndpoint>, mut surface: S, options: WidgetOptions) -> (Self, Completions) {
        let (tx, rx) = mpsc::unbounded_channel();
        let panel = PanelState::default();
        surface.set_panel_visible(panel.is_open());
        let widget = Self {
            endpoint,
            surface,
            panel,
            input: String::new(),
            log: MessageLog::new(),
            options,
            in_flight: HashSet::new(),
            next_request: 0,
            tx,
        };
        (widget, Completions { rx })
    }

    #[must_use]
    pub fn panel(&self) -> PanelState {
        self.panel
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of `/chat` requests awaiting a reply.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Flip the panel between shown and hidden.
    pub fn toggle_panel(&mut self) -> PanelState {
        let state = self.panel.toggle();
        debug!(open = state.is_open(), "widget: panel toggled");
        self.surface.set_panel_visible(state.is_open());
        state
    }

    /// Replace the input buffer, as if the user had typed `text`.
    pub fn set_input(&mut self, text: &str) {
        text.clone_into(&mut self.input);
        self.surface.set_input(&self.input);
    }

    /// Route a key press. Ignored while the panel is closed.
    pub fn handle_key(&mut self, key: Key) -> Option<SubmitOutcome> {
        if !self.panel.is_open() {
            return None;
        }
        match key {
            Key::Char(c) => {
                self.input.push(c);
                self.surface.set_input(&self.input);
                None
            }
            Key::Backspace => {
                self.input.pop();
                self.surface.set_input(&self.input);
                None
            }
            Key::Enter => Some(self.submit_message()),
        }
    }

    /// Submit the trimmed input buffer.
    ///
    /// The user's entry is logged and the input cleared before the request
    /// task is spawned, so feedback never waits on the network. Must be
    /// called from within a tokio runtime.
    pub fn submit_message(&mut self) -> SubmitOutcome {
        let text = self.input.trim().to_owned();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.options.policy == SubmitPolicy::SingleFlight && !self.in_flight.is_empty() {
            debug!("widget: submission rejected, request outstanding");
            return SubmitOutcome::Busy;
        }

        self.render_message(Sender::You, &text);
        self.input.clear();
        self.surface.set_input("");

        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.in_flight.insert(request);
        info!(request = request.0, text_len = text.len(), "widget: message submitted");

        let endpoint = Arc::clone(&self.endpoint);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = endpoint.send(&text).await;
            // Receiver gone means the widget was dropped; nothing left to render.
            let _ = tx.send(Completion::Reply { request, result });
        });

        SubmitOutcome::Sent(request)
    }

    /// Show help or status text on the surface without logging it.
    pub fn show_notice(&mut self, text: &str) {
        self.surface.show_notice(text);
    }

    /// Append an entry, render it and keep the newest entry in view.
    pub fn render_message(&mut self, sender: Sender, text: &str) {
        let message = Message::new(sender, text);
        self.surface.append_entry(&message);
        self.surface.scroll_to_end();
        self.log.push(message);
    }

    /// Apply a finished background operation to the log.
    pub fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Reply { request, result } => {
                self.in_flight.remove(&request);
                match result {
                    Ok(reply) => {
                        debug!(request = request.0, admin = reply.admin, "widget: reply received");
                        self.render_message(Sender::Bot, &reply.reply);
                        if let Some(ticket_id) = reply.pending_ticket() {
                            self.watch_ticket(ticket_id.to_owned());
                        }
                    }
                    Err(e) => {
                        warn!(request = request.0, error = %e, "widget: chat request failed");
                        self.render_message(Sender::System, &format!("Message could not be delivered: {e}"));
                    }
                }
            }
            Completion::TicketAnswered { ticket_id, reply } => {
                info!(%ticket_id, "widget: admin answered ticket");
                self.render_message(Sender::Admin, &reply);
            }
            Completion::TicketFailed { ticket_id, error } => {
                warn!(%ticket_id, error = %error, "widget: ticket check failed");
                self.render_message(Sender::System, &format!("Could not check ticket {ticket_id}: {error}"));
            }
            Completion::TicketExpired { ticket_id } => {
                warn!(%ticket_id, "widget: stopped waiting for admin");
                self.render_message(Sender::System, &format!("No admin reply to ticket {ticket_id} yet; stopped checking."));
            }
        }
    }

    /// Poll `/chat/check/{ticket_id}` in the background until answered.
    fn watch_ticket(&self, ticket_id: String) {
        let endpoint = Arc::clone(&self.endpoint);
        let tx = self.tx.clone();
        let interval = self.options.ticket_poll_interval;
        let limit = self.options.ticket_poll_limit;
        debug!(%ticket_id, ?interval, limit, "widget: watching ticket");

        tokio::spawn(async move {
            for _ in 0..limit {
                tokio::time::sleep(interval).await;
                let checked = endpoint.check_ticket(&ticket_id).await;
                let completion = match checked {
                    Ok(None) => continue,
                    Ok(Some(reply)) => Completion::TicketAnswered { ticket_id, reply },
                    Err(error) => Completion::TicketFailed { ticket_id, error },
                };
                let _ = tx.send(completion);
                return;
            }
            debug!(%ticket_id, "widget: ticket poll limit reached");
            let _ = tx.send(Completion::TicketExpired { ticket_id });
        });
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
