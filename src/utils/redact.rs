use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

static API_KEY_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{4,}").ok());

/// Masks user-authored content in a JSON payload before it is logged.
/// Covers chat message bodies and planner fields such as tasks and goals.
pub fn redact_sensitive_data(data: &JsonValue) -> JsonValue {
    redact_value(data)
}

/// Replaces anything shaped like an API key in free text.
pub fn redact_secrets(text: &str) -> String {
    match API_KEY_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(text, "sk-[REDACTED]").into_owned(),
        None => text.to_string(),
    }
}

/// Short fingerprint of a credential, safe to log.
pub fn mask_api_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{visible}")
}

fn redact_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut redacted_map = serde_json::Map::new();
            for (key, val) in map {
                let redacted_val = if is_sensitive_field(key) {
                    redact_leaf(val)
                } else {
                    redact_value(val)
                };
                redacted_map.insert(key.clone(), redacted_val);
            }
            JsonValue::Object(redacted_map)
        }
        JsonValue::Array(arr) => JsonValue::Array(arr.iter().map(redact_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    matches!(
        lower.as_str(),
        "content" | "prioritytasks" | "personalgoal" | "name" | "email" | "password"
    )
}

fn redact_leaf(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(s) if !s.is_empty() => JsonValue::String("[REDACTED]".to_string()),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(redact_leaf).collect()),
        _ => value.clone(),
    }
}
