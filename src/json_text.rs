//! Flattening of loosely-typed JSON values into display strings.

use serde_json::Value;

/// Renders a JSON value as a metadata string.
///
/// Strings are returned verbatim, scalars use their JSON text, `null` becomes
/// an empty string and arrays or objects are JSON-encoded.
pub(crate) fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Returns the trimmed string content of a scalar JSON value, if any.
///
/// Numbers are accepted so that numeric identifiers survive decoding.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()).filter(|trimmed| !trimmed.is_empty()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{flatten, scalar_text};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!("plain"), "plain")]
    #[case(json!(42), "42")]
    #[case(json!(true), "true")]
    #[case(Value::Null, "")]
    #[case(json!(["a", "b"]), r#"["a","b"]"#)]
    #[case(json!({"name": "High"}), r#"{"name":"High"}"#)]
    fn flatten_renders_each_json_kind(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(flatten(&value), expected);
    }

    #[rstest]
    #[case(json!("  PROJ-7 "), Some("PROJ-7"))]
    #[case(json!(10042), Some("10042"))]
    #[case(json!("   "), None)]
    #[case(json!({"key": "PROJ-7"}), None)]
    fn scalar_text_accepts_strings_and_numbers(
        #[case] value: Value,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(scalar_text(&value).as_deref(), expected);
    }
}
