//! Assistant service: `/chat` message → LLM reply or admin hand-off.
//!
//! DESIGN
//! ======
//! Each message is answered in a single turn: the configured system prompt
//! plus the user's text, nothing else. When no LLM is configured, the call
//! fails, or the model returns no text, the question is queued as a ticket
//! and the caller gets a fixed hand-off reply carrying the ticket id.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};
use crate::protocol::ChatReply;
use crate::state::AppState;

pub const ADMIN_HANDOFF_REPLY: &str = "Our admin will reply shortly.";
pub const DEFAULT_ASSISTANT_MAX_TOKENS: u32 = 512;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are the customer assistant on a small business website.

Customers can submit requests through the website, receive a Track ID, and
use it to follow the status of their request (Pending, Approved or Rejected).

RULES:
- Reply in the same language as the customer
- Keep answers short and clear
- Do not make up prices, dates or policies
- If you do not know something, say an admin will assist";

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub system_prompt: String,
    pub max_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(), max_tokens: DEFAULT_ASSISTANT_MAX_TOKENS }
    }
}

impl AssistantConfig {
    /// Read `ASSISTANT_SYSTEM_PROMPT` and `ASSISTANT_MAX_TOKENS` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let system_prompt = lookup("ASSISTANT_SYSTEM_PROMPT")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(defaults.system_prompt);
        let max_tokens = lookup("ASSISTANT_MAX_TOKENS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_tokens);
        Self { system_prompt, max_tokens }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("LLM returned an empty reply")]
    EmptyReply,
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Ask the LLM for a single-turn answer to `message`.
///
/// # Errors
///
/// Returns [`AssistantError::Llm`] on provider failure and
/// [`AssistantError::EmptyReply`] when the response carries no text.
pub async fn ask(llm: &dyn LlmChat, config: &AssistantConfig, message: &str) -> Result<String, AssistantError> {
    let messages = [Message::user(message)];
    let response = llm.chat(config.max_tokens, &config.system_prompt, &messages).await?;
    info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "assistant: llm replied"
    );
    if response.truncated() {
        warn!(max_tokens = config.max_tokens, "assistant: reply hit the token limit");
    }
    response.reply().ok_or(AssistantError::EmptyReply)
}

/// Answer a `/chat` message, falling back to an admin ticket on any failure.
pub async fn handle_message(state: &AppState, message: &str) -> ChatReply {
    let result = match &state.llm {
        Some(llm) => ask(Arc::as_ref(llm), &state.assistant, message).await,
        None => Err(AssistantError::LlmNotConfigured),
    };

    match result {
        Ok(reply) => ChatReply::answered(reply),
        Err(e) => {
            let retryable = matches!(&e, AssistantError::Llm(err) if err.retryable());
            warn!(error = %e, retryable, "assistant: handing message to admin");
            let ticket_id = state.tickets.open(message).await;
            ChatReply::handed_off(ADMIN_HANDOFF_REPLY, ticket_id)
        }
    }
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
