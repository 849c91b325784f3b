use super::*;
use crate::llm::types::{ChatResponse, ContentBlock};
use crate::state::test_helpers::{self, MockLlm, text_response};
use std::collections::HashMap;

// =========================================================================
// AssistantConfig
// =========================================================================

#[test]
fn config_defaults() {
    let cfg = AssistantConfig::from_lookup(|_| None);
    assert_eq!(cfg, AssistantConfig::default());
    assert!(cfg.system_prompt.contains("admin will assist"));
    assert_eq!(cfg.max_tokens, DEFAULT_ASSISTANT_MAX_TOKENS);
}

#[test]
fn config_overrides() {
    let vars: HashMap<&str, &str> =
        HashMap::from([("ASSISTANT_SYSTEM_PROMPT", "You sell bikes."), ("ASSISTANT_MAX_TOKENS", "64")]);
    let cfg = AssistantConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()));
    assert_eq!(cfg.system_prompt, "You sell bikes.");
    assert_eq!(cfg.max_tokens, 64);
}

#[test]
fn config_rejects_blank_prompt_and_zero_tokens() {
    let vars: HashMap<&str, &str> = HashMap::from([("ASSISTANT_SYSTEM_PROMPT", "   "), ("ASSISTANT_MAX_TOKENS", "0")]);
    let cfg = AssistantConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()));
    assert_eq!(cfg, AssistantConfig::default());
}

// =========================================================================
// ask
// =========================================================================

#[tokio::test]
async fn ask_sends_single_turn_prompt() {
    let llm = MockLlm::new(vec![Ok(text_response("  We open at 9.  "))]);
    let cfg = AssistantConfig::default();

    let reply = ask(&llm, &cfg, "hours?").await.unwrap();
    assert_eq!(reply, "We open at 9.");

    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, cfg.system_prompt);
    assert_eq!(calls[0].1, vec![Message::user("hours?")]);
}

#[tokio::test]
async fn ask_empty_text_is_error() {
    let empty = ChatResponse {
        content: vec![ContentBlock::Thinking { thinking: "...".into() }],
        model: "mock".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 0,
        output_tokens: 0,
    };
    let llm = MockLlm::new(vec![Ok(empty)]);
    let err = ask(&llm, &AssistantConfig::default(), "q").await.unwrap_err();
    assert!(matches!(err, AssistantError::EmptyReply));
}

#[tokio::test]
async fn ask_propagates_llm_error() {
    let llm = MockLlm::new(vec![Err(LlmError::ApiResponse { status: 500, body: String::new() })]);
    let err = ask(&llm, &AssistantConfig::default(), "q").await.unwrap_err();
    assert!(matches!(err, AssistantError::Llm(LlmError::ApiResponse { status: 500, .. })));
}

// =========================================================================
// handle_message
// =========================================================================

#[tokio::test]
async fn handle_message_returns_llm_reply() {
    let llm = Arc::new(MockLlm::new(vec![Ok(text_response("Hello!"))]));
    let state = test_helpers::test_app_state_with_llm(llm);

    let reply = handle_message(&state, "hi").await;
    assert_eq!(reply, ChatReply::answered("Hello!"));
    assert!(state.tickets.pending().await.is_empty());
}

#[tokio::test]
async fn handle_message_without_llm_opens_ticket() {
    let state = test_helpers::test_app_state();

    let reply = handle_message(&state, "price of blue saree?").await;
    assert!(reply.admin);
    assert_eq!(reply.reply, ADMIN_HANDOFF_REPLY);
    let ticket_id = reply.ticket_id.expect("hand-off carries ticket id");

    let pending = state.tickets.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ticket_id);
    assert_eq!(pending[0].question, "price of blue saree?");
}

#[tokio::test]
async fn handle_message_llm_failure_opens_ticket() {
    let llm = Arc::new(MockLlm::new(vec![Err(LlmError::ApiRequest("timeout".into()))]));
    let state = test_helpers::test_app_state_with_llm(llm);

    let reply = handle_message(&state, "q").await;
    assert!(reply.pending_ticket().is_some());
    assert_eq!(state.tickets.pending().await.len(), 1);
}
