//! Chat routes: `/chat`, ticket follow-up and admin replies.
//!
//! The admin routes are unauthenticated; deployments that expose them
//! publicly must put them behind their own access control.

use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::protocol::{ChatReply, ChatRequest, TicketStatus};
use crate::services::assistant;
use crate::services::tickets::{Ticket, TicketError};
use crate::state::AppState;

pub(crate) fn ticket_error_to_status(err: TicketError) -> StatusCode {
    match err {
        TicketError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// `POST /chat`: answer one message.
pub async fn post_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, StatusCode> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    debug!(message_len = message.len(), "chat: message received");
    Ok(Json(assistant::handle_message(&state, message).await))
}

/// `GET /chat/check/{ticket_id}`: admin reply if one exists yet.
pub async fn check_ticket(State(state): State<AppState>, Path(ticket_id): Path<String>) -> Json<TicketStatus> {
    Json(TicketStatus { reply: state.tickets.reply_for(&ticket_id).await })
}

/// `GET /admin/chat/pending`: unanswered tickets, oldest first.
pub async fn list_pending(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.tickets.pending().await)
}

#[derive(Debug, Deserialize)]
pub struct AdminReplyForm {
    pub id: String,
    pub reply: String,
}

/// `POST /admin/chat/reply`: answer a pending ticket.
pub async fn admin_reply(
    State(state): State<AppState>,
    Form(form): Form<AdminReplyForm>,
) -> Result<Json<Ticket>, StatusCode> {
    let reply = form.reply.trim();
    if reply.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    state
        .tickets
        .answer(form.id.trim(), reply)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "chat: admin reply rejected");
            ticket_error_to_status(e)
        })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
