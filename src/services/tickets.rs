//! Admin hand-off tickets.
//!
//! DESIGN
//! ======
//! Questions the assistant cannot answer become tickets. A ticket sits in
//! `pending` until an admin replies, then moves to `answered`, where
//! `/chat/check/{id}` can find it. Only the most recent answers are kept;
//! older ones are evicted first. The queue is in memory only and is lost on
//! restart.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const TICKET_ID_LEN: usize = 8;
pub const DEFAULT_ANSWERED_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("no pending ticket {0}")]
    NotFound(String),
}

/// A question handed to a human admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

#[derive(Debug)]
struct TicketBook {
    pending: Vec<Ticket>,
    answered: VecDeque<Ticket>,
    answered_capacity: usize,
}

/// Shared handle to the ticket queue. Clone is cheap.
#[derive(Debug, Clone)]
pub struct TicketStore {
    inner: Arc<RwLock<TicketBook>>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::with_answered_capacity(DEFAULT_ANSWERED_CAPACITY)
    }
}

/// Short ticket id: the first 8 hex characters of a v4 UUID.
#[must_use]
pub fn generate_ticket_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(TICKET_ID_LEN);
    id
}

impl TicketStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that remembers at most `capacity` answered tickets (minimum 1).
    #[must_use]
    pub fn with_answered_capacity(capacity: usize) -> Self {
        let book = TicketBook { pending: Vec::new(), answered: VecDeque::new(), answered_capacity: capacity.max(1) };
        Self { inner: Arc::new(RwLock::new(book)) }
    }

    /// Queue a question for an admin and return its ticket id.
    pub async fn open(&self, question: &str) -> String {
        let mut book = self.inner.write().await;
        let mut id = generate_ticket_id();
        while book.pending.iter().chain(&book.answered).any(|t| t.id == id) {
            id = generate_ticket_id();
        }
        book.pending.push(Ticket { id: id.clone(), question: question.to_owned(), reply: None });
        info!(ticket_id = %id, pending = book.pending.len(), "tickets: opened");
        id
    }

    /// Record the admin's reply and move the ticket to answered.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotFound`] if no pending ticket has `id`.
    pub async fn answer(&self, id: &str, reply: &str) -> Result<Ticket, TicketError> {
        let mut book = self.inner.write().await;
        let pos = book
            .pending
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TicketError::NotFound(id.to_owned()))?;
        let mut ticket = book.pending.remove(pos);
        ticket.reply = Some(reply.to_owned());
        if book.answered.len() >= book.answered_capacity {
            if let Some(evicted) = book.answered.pop_front() {
                debug!(ticket_id = %evicted.id, "tickets: evicted oldest answer");
            }
        }
        book.answered.push_back(ticket.clone());
        info!(ticket_id = %id, "tickets: answered");
        Ok(ticket)
    }

    /// Admin reply for `id`, or `None` while pending or unknown.
    pub async fn reply_for(&self, id: &str) -> Option<String> {
        let book = self.inner.read().await;
        book.answered
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.reply.clone())
    }

    /// Snapshot of unanswered tickets, oldest first.
    pub async fn pending(&self) -> Vec<Ticket> {
        self.inner.read().await.pending.clone()
    }
}

#[cfg(test)]
#[path = "tickets_test.rs"]
mod tests;
