//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the chat endpoint the widget talks to, the ticket follow-up and
//! admin reply routes, and a health probe under a single Axum router.

pub mod chat;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat::post_chat))
        .route("/chat/check/{ticket_id}", get(chat::check_ticket))
        .route("/admin/chat/pending", get(chat::list_pending))
        .route("/admin/chat/reply", post(chat::admin_reply))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// TEST HELPERS
// =============================================================================
