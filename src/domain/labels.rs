use std::collections::BTreeMap;

use crate::config::{LabelSource, TicketInformation};
use crate::domain::incident::{IncidentTag, SerializedIncident, is_truthy, label_text};
use crate::error::{PluginError, PluginResult};

/// Labels derived from an incident, and the configured sources that had no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelection {
    pub labels: Vec<String>,
    pub missing_fields: Vec<String>,
}

/// Splits `key=value` tags into a map. Later tags override earlier ones with
/// the same key. A tag without exactly one `=` is rejected.
pub fn convert_tags_to_dict(tags: &[IncidentTag]) -> PluginResult<BTreeMap<String, String>> {
    let mut converted = BTreeMap::new();
    for IncidentTag { tag } in tags {
        let mut parts = tag.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                converted.insert(key.to_string(), value.to_string());
            }
            _ => return Err(PluginError::MalformedTag(tag.clone())),
        }
    }
    Ok(converted)
}

pub fn get_labels(
    ticket_information: &TicketInformation,
    incident: &SerializedIncident,
) -> PluginResult<LabelSelection> {
    let mut selection = LabelSelection {
        labels: ticket_information.labels_set.clone(),
        missing_fields: Vec::new(),
    };

    let needs_tags = ticket_information
        .labels_mapping
        .iter()
        .any(|source| matches!(source, LabelSource::ByTag { .. }));
    let tags = if needs_tags {
        convert_tags_to_dict(&incident.tags()?)?
    } else {
        BTreeMap::new()
    };

    for source in &ticket_information.labels_mapping {
        match source {
            LabelSource::ByTag { tag } => match tags.get(tag) {
                Some(value) if !value.is_empty() => selection.labels.push(value.clone()),
                _ => selection.missing_fields.push(tag.clone()),
            },
            LabelSource::ByField(name) => match incident.field(name) {
                Some(value) if is_truthy(value) => selection.labels.push(label_text(value)),
                _ => selection.missing_fields.push(name.clone()),
            },
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn tags(raw: &[&str]) -> Vec<IncidentTag> {
        raw.iter()
            .map(|tag| IncidentTag {
                tag: tag.to_string(),
            })
            .collect()
    }

    fn info(labels_set: &[&str], labels_mapping: Value) -> TicketInformation {
        TicketInformation {
            project_namespace_and_name: "ns/name".to_string(),
            labels_set: labels_set.iter().map(|l| l.to_string()).collect(),
            labels_mapping: serde_json::from_value(labels_mapping).unwrap(),
        }
    }

    fn incident(value: Value) -> SerializedIncident {
        SerializedIncident::from_value(value).unwrap()
    }

    #[test]
    fn converts_tags() {
        let converted = convert_tags_to_dict(&tags(&["a=1", "b=2"])).unwrap();
        assert_eq!(
            converted,
            BTreeMap::from([
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
        );
    }

    #[test]
    fn last_duplicate_tag_wins() {
        let converted = convert_tags_to_dict(&tags(&["env=dev", "env=prod"])).unwrap();
        assert_eq!(converted.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn keeps_empty_tag_values() {
        let converted = convert_tags_to_dict(&tags(&["env="])).unwrap();
        assert_eq!(converted.get("env").map(String::as_str), Some(""));
    }

    #[test]
    fn rejects_malformed_tags() {
        for bad in ["no-separator", "a=b=c"] {
            let err = convert_tags_to_dict(&tags(&[bad])).unwrap_err();
            assert!(matches!(err, PluginError::MalformedTag(ref tag) if tag == bad));
        }
    }

    #[test]
    fn field_mapping_adds_value() {
        let selection = get_labels(
            &info(&["argus"], json!(["description"])),
            &incident(json!({"description": "X", "tags": []})),
        )
        .unwrap();
        assert_eq!(selection.labels, vec!["argus", "X"]);
        assert!(selection.missing_fields.is_empty());
    }

    #[test]
    fn absent_tag_is_reported_missing() {
        let selection = get_labels(
            &info(&[], json!([{"tag": "env"}])),
            &incident(json!({"description": "X", "tags": [{"tag": "host=db1"}]})),
        )
        .unwrap();
        assert!(selection.labels.is_empty());
        assert_eq!(selection.missing_fields, vec!["env"]);
    }

    #[test]
    fn present_tag_adds_value() {
        let selection = get_labels(
            &info(&[], json!([{"tag": "env"}, {"tag": "host"}])),
            &incident(json!({
                "description": "X",
                "tags": [{"tag": "host=db1"}, {"tag": "env=prod"}],
            })),
        )
        .unwrap();
        assert_eq!(selection.labels, vec!["prod", "db1"]);
        assert!(selection.missing_fields.is_empty());
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let selection = get_labels(
            &info(&[], json!(["level", "ticket_url", "source", {"tag": "env"}])),
            &incident(json!({
                "description": "X",
                "level": 0,
                "ticket_url": "",
                "source": null,
                "tags": [{"tag": "env="}],
            })),
        )
        .unwrap();
        assert!(selection.labels.is_empty());
        assert_eq!(
            selection.missing_fields,
            vec!["level", "ticket_url", "source", "env"]
        );
    }

    #[test]
    fn mapping_order_is_preserved() {
        let selection = get_labels(
            &info(&["static"], json!(["level", {"tag": "env"}, "missing"])),
            &incident(json!({
                "description": "X",
                "level": 2,
                "tags": [{"tag": "env=prod"}],
            })),
        )
        .unwrap();
        assert_eq!(selection.labels, vec!["static", "2", "prod"]);
        assert_eq!(selection.missing_fields, vec!["missing"]);
    }

    #[test]
    fn malformed_tags_only_matter_when_tags_are_mapped() {
        let bad_incident = incident(json!({"description": "X", "tags": [{"tag": "oops"}]}));
        assert!(get_labels(&info(&[], json!(["description"])), &bad_incident).is_ok());
        assert!(matches!(
            get_labels(&info(&[], json!([{"tag": "env"}])), &bad_incident),
            Err(PluginError::MalformedTag(_))
        ));
    }

    #[test]
    fn tag_entry_without_tag_string_is_malformed() {
        let bad_incident = incident(json!({"description": "X", "tags": [{"tag": null}]}));
        assert!(matches!(
            get_labels(&info(&[], json!([{"tag": "env"}])), &bad_incident),
            Err(PluginError::MalformedTag(_))
        ));
    }

    #[test]
    fn repeated_calls_agree() {
        let information = info(&["a"], json!(["description", {"tag": "env"}]));
        let incident = incident(json!({"description": "X", "tags": [{"tag": "env=prod"}]}));
        let first = get_labels(&information, &incident).unwrap();
        let second = get_labels(&information, &incident).unwrap();
        assert_eq!(first, second);
    }
}
