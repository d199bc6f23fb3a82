//! Rendering helpers for mention paths and values

use serde_json::Value;

const ESCAPED_KEY_CHARS: [char; 7] = ['\\', '"', '\'', '\n', '\r', '\t', '’'];

/// Backslash-prefixes the characters that would break a quoted path segment
pub fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if ESCAPED_KEY_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Human-readable rendering of a scalar output value.
///
/// Strings keep their JSON quotes so `"1"` and `1` stay distinguishable.
pub fn format_step_output(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
