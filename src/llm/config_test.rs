use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_to_anthropic() {
    let cfg = LlmConfig::from_lookup(lookup(&[("LLM_API_KEY_ENV", "TEST_KEY"), ("TEST_KEY", "secret")])).unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, "claude-sonnet-4-5-20250929");
    assert_eq!(cfg.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        LlmTimeouts { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.api_key, "secret");
}

#[test]
fn openai_with_overrides() {
    let cfg = LlmConfig::from_lookup(lookup(&[
        ("LLM_PROVIDER", "openai"),
        ("LLM_API_KEY_ENV", "OPENAI_API_KEY"),
        ("OPENAI_API_KEY", "sk-test"),
        ("LLM_MODEL", "gpt-4.1"),
        ("LLM_OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ("LLM_REQUEST_TIMEOUT_SECS", "15"),
        ("LLM_CONNECT_TIMEOUT_SECS", "3"),
    ]))
    .unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::OpenAi);
    assert_eq!(cfg.model, "gpt-4.1");
    assert_eq!(cfg.openai_base_url, "http://localhost:8080/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 15, connect_secs: 3 });
}

#[test]
fn openai_default_model() {
    let cfg = LlmConfig::from_lookup(lookup(&[("LLM_PROVIDER", "openai"), ("LLM_API_KEY_ENV", "K"), ("K", "v")])).unwrap();
    assert_eq!(cfg.model, "gpt-4o-mini");
}

#[test]
fn invalid_timeout_falls_back_to_default() {
    let cfg = LlmConfig::from_lookup(lookup(&[
        ("LLM_API_KEY_ENV", "K"),
        ("K", "v"),
        ("LLM_REQUEST_TIMEOUT_SECS", "soon"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_LLM_REQUEST_TIMEOUT_SECS);
}

#[test]
fn missing_key_env_name() {
    let err = LlmConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "LLM_API_KEY_ENV"));
}

#[test]
fn missing_key_value_names_variable() {
    let err = LlmConfig::from_lookup(lookup(&[("LLM_API_KEY_ENV", "ABSENT_KEY")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "ABSENT_KEY"));
}

#[test]
fn unknown_provider_rejected() {
    let err = LlmConfig::from_lookup(lookup(&[("LLM_PROVIDER", "gemini"), ("LLM_API_KEY_ENV", "K"), ("K", "v")]))
        .unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(ref msg) if msg.contains("gemini")));
}
