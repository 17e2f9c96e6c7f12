use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PluginError, PluginResult};

/// An incident as serialized by the host. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedIncident(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentTag {
    pub tag: String,
}

impl SerializedIncident {
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(format!("expected a JSON object, got {}", kind(&other))),
        }
    }

    /// The incident description; absent when missing, not a string, or blank.
    pub fn description(&self) -> Option<&str> {
        self.0
            .get("description")
            .and_then(Value::as_str)
            .filter(|description| !description.trim().is_empty())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Tag entries in incident order. Every entry needs a string `tag`.
    pub fn tags(&self) -> PluginResult<Vec<IncidentTag>> {
        let entries = match self.0.get("tags") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(PluginError::InvalidIncident(format!(
                    "'tags' must be an array, got {}",
                    kind(other)
                )));
            }
        };

        entries
            .iter()
            .map(|entry| match entry.get("tag").and_then(Value::as_str) {
                Some(tag) => Ok(IncidentTag {
                    tag: tag.to_string(),
                }),
                None => Err(PluginError::MalformedTag(entry.to_string())),
            })
            .collect()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Null, false, zero, and empty strings or collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Label text for a field value: strings verbatim, anything else as JSON.
pub fn label_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn incident(value: Value) -> SerializedIncident {
        SerializedIncident::from_value(value).unwrap()
    }

    #[test]
    fn reads_description_and_tags() {
        let incident = incident(json!({
            "description": "Disk full",
            "tags": [
                {"tag": "host=db1", "added_by": 1},
                {"tag": "env=prod"},
            ],
        }));
        assert_eq!(incident.description(), Some("Disk full"));
        let tags: Vec<_> = incident.tags().unwrap().into_iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec!["host=db1", "env=prod"]);
    }

    #[test]
    fn missing_tags_yield_empty_list() {
        assert!(incident(json!({"description": "x"})).tags().unwrap().is_empty());
    }

    #[test]
    fn tag_entry_without_string_tag_is_malformed() {
        for entry in [json!({"added_by": 2}), json!({"tag": 5}), json!("env=prod")] {
            let err = incident(json!({"description": "x", "tags": [entry]}))
                .tags()
                .unwrap_err();
            assert!(matches!(err, PluginError::MalformedTag(_)), "{err}");
        }
    }

    #[test]
    fn tags_must_be_an_array() {
        let err = incident(json!({"description": "x", "tags": "env=prod"}))
            .tags()
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidIncident(_)));
    }

    #[test]
    fn description_must_be_a_non_blank_string() {
        assert_eq!(incident(json!({"tags": []})).description(), None);
        assert_eq!(incident(json!({"description": 3})).description(), None);
        assert_eq!(incident(json!({"description": "  "})).description(), None);
    }

    #[test]
    fn rejects_non_object_incident() {
        let err = SerializedIncident::from_value(json!(["a"])).unwrap_err();
        assert_eq!(err, "expected a JSON object, got an array");
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(3), json!("x"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn label_text_keeps_strings_unquoted() {
        assert_eq!(label_text(&json!("critical")), "critical");
        assert_eq!(label_text(&json!(4)), "4");
    }
}
