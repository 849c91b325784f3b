use super::*;

#[test]
fn parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{ "message": { "role": "assistant", "content": "Hi there" }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
    })
    .to_string();
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.text(), "Hi there");
    assert_eq!(resp.model, "gpt-4o-mini");
    assert_eq!(resp.stop_reason, "stop");
    assert_eq!(resp.input_tokens, 12);
    assert_eq!(resp.output_tokens, 3);
}

#[test]
fn parse_length_maps_to_max_tokens() {
    let json = serde_json::json!({
        "choices": [{ "message": { "content": "cut" }, "finish_reason": "length" }]
    })
    .to_string();
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn parse_null_content_is_empty() {
    let json = serde_json::json!({
        "choices": [{ "message": { "content": null } }]
    })
    .to_string();
    let resp = parse_response(&json).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.text(), "");
}

#[test]
fn parse_missing_choices() {
    let json = serde_json::json!({ "model": "m", "choices": [] }).to_string();
    assert!(matches!(parse_response(&json), Err(LlmError::ApiParse(msg)) if msg.contains("no choices")));
}

#[test]
fn parse_invalid_json() {
    assert!(matches!(parse_response("<html>"), Err(LlmError::ApiParse(_))));
}

#[test]
fn build_messages_prepends_system() {
    let messages = [Message::user("hello")];
    let built = build_messages("be brief", &messages);
    assert_eq!(built.len(), 2);
    assert_eq!(built[0].role, "system");
    assert_eq!(built[0].content, "be brief");
    assert_eq!(built[1].role, "user");
    assert_eq!(built[1].content, "hello");
}

#[test]
fn build_messages_skips_empty_system() {
    let messages = [Message::user("hello")];
    let built = build_messages("", &messages);
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].role, "user");
}
