use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_with_key_present() {
    let lookup = lookup_from(&[("GEMINI_API_KEY", "secret")]);
    let cfg = GenAiConfig::from_lookup(lookup).unwrap();

    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.image_model, DEFAULT_IMAGE_MODEL);
    assert_eq!(cfg.text_model, DEFAULT_TEXT_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        GenAiTimeouts {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    );
}

#[test]
fn missing_key_errors_with_var_name() {
    let err = GenAiConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, GenAiError::MissingApiKey { ref var } if var == "GEMINI_API_KEY"));
}

#[test]
fn key_env_indirection() {
    let lookup = lookup_from(&[("GENAI_API_KEY_ENV", "MY_KEY"), ("MY_KEY", "other-secret")]);
    let cfg = GenAiConfig::from_lookup(lookup).unwrap();
    assert_eq!(cfg.api_key, "other-secret");
}

#[test]
fn key_env_indirection_missing_target_errors() {
    let lookup = lookup_from(&[("GENAI_API_KEY_ENV", "MY_KEY")]);
    let err = GenAiConfig::from_lookup(lookup).unwrap_err();
    assert!(matches!(err, GenAiError::MissingApiKey { ref var } if var == "MY_KEY"));
}

#[test]
fn overrides_are_applied() {
    let lookup = lookup_from(&[
        ("GEMINI_API_KEY", "secret"),
        ("GENAI_IMAGE_MODEL", "imagen-test"),
        ("GENAI_TEXT_MODEL", "gemini-test"),
        ("GENAI_BASE_URL", "https://example.test/v1beta/"),
        ("GENAI_REQUEST_TIMEOUT_SECS", "42"),
        ("GENAI_CONNECT_TIMEOUT_SECS", "7"),
    ]);
    let cfg = GenAiConfig::from_lookup(lookup).unwrap();

    assert_eq!(cfg.image_model, "imagen-test");
    assert_eq!(cfg.text_model, "gemini-test");
    assert_eq!(cfg.base_url, "https://example.test/v1beta");
    assert_eq!(cfg.timeouts, GenAiTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn unparseable_timeout_errors() {
    let lookup = lookup_from(&[("GEMINI_API_KEY", "secret"), ("GENAI_REQUEST_TIMEOUT_SECS", "soon")]);
    let err = GenAiConfig::from_lookup(lookup).unwrap_err().to_string();
    assert!(err.contains("GENAI_REQUEST_TIMEOUT_SECS"));
}
