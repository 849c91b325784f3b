//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the optional LLM client, the assistant prompt settings and the
//! admin ticket queue.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::services::assistant::AssistantConfig;
use crate::services::tickets::TicketStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub assistant: Arc<AssistantConfig>,
    pub tickets: TicketStore,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, assistant: AssistantConfig) -> Self {
        Self { llm, assistant: Arc::new(assistant), tickets: TicketStore::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};

    /// Scripted `LlmChat`: pops queued results, then answers "done".
    #[derive(Default)]
    pub struct MockLlm {
        responses: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
        pub calls: Mutex<Vec<(String, Vec<Message>)>>,
    }

    impl MockLlm {
        pub fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Self {
            Self { responses: Mutex::new(responses.into()), calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn chat(&self, _max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_owned(), messages.to_vec()));
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(text_response("done")))
        }
    }

    #[must_use]
    pub fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            content: vec![ContentBlock::Text { text: text.into() }],
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }

    /// Create a test `AppState` without an LLM.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None, AssistantConfig::default())
    }

    /// Create a test `AppState` with a mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(Some(llm), AssistantConfig::default())
    }
}
