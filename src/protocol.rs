//! Wire types for the `/chat` endpoint.
//!
//! Shared by the axum handlers and the widget's HTTP endpoint so both sides
//! agree on field names. The client parses replies leniently (see
//! `endpoint::parse_reply`); these structs describe the well-formed shape.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// `true` when the question was handed to a human admin.
    #[serde(default)]
    pub admin: bool,
    /// Ticket to poll via `/chat/check/{ticket_id}` when `admin` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

impl ChatReply {
    #[must_use]
    pub fn answered(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), admin: false, ticket_id: None }
    }

    #[must_use]
    pub fn handed_off(reply: impl Into<String>, ticket_id: impl Into<String>) -> Self {
        Self { reply: reply.into(), admin: true, ticket_id: Some(ticket_id.into()) }
    }

    /// Ticket to follow up on, if this reply is an admin hand-off.
    #[must_use]
    pub fn pending_ticket(&self) -> Option<&str> {
        if self.admin { self.ticket_id.as_deref() } else { None }
    }
}

/// Body returned by `GET /chat/check/{ticket_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatus {
    pub reply: Option<String>,
}
