//! Display forms for JSON values used as defaults and literal members.
//!
//! Values are shown the way model authors write them in annotations:
//! `None`, `True`/`False`, quoted strings inside containers.

use serde_json::Value;

/// Format a value for display as a field default.
///
/// Top-level strings are shown verbatim; everything else uses [`repr`].
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => repr(other),
    }
}

/// Format a value in its quoted, literal form.
#[must_use]
pub fn repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_owned(),
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), repr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\'', "\\'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_scalars() {
        assert_eq!(display(&json!(1)), "1");
        assert_eq!(display(&json!(2.5)), "2.5");
        assert_eq!(display(&json!("text")), "text");
        assert_eq!(display(&json!(null)), "None");
        assert_eq!(display(&json!(true)), "True");
        assert_eq!(display(&json!(false)), "False");
    }

    #[test]
    fn test_display_containers() {
        assert_eq!(display(&json!([])), "[]");
        assert_eq!(display(&json!(["a", 1])), "['a', 1]");
        assert_eq!(display(&json!({})), "{}");
        assert_eq!(display(&json!({"k": [true]})), "{'k': [True]}");
    }

    #[test]
    fn test_repr_quotes_strings() {
        assert_eq!(repr(&json!("dev")), "'dev'");
        assert_eq!(repr(&json!("it's")), "\"it's\"");
    }
}
