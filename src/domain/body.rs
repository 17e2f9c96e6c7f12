use handlebars::Handlebars;
use serde_json::Value;

use crate::domain::incident::SerializedIncident;
use crate::error::{PluginError, PluginResult};

const TEMPLATE_NAME: &str = "issue_body";

const ISSUE_BODY_TEMPLATE: &str = r#"## Incident{{#if pk}} #{{pk}}{{/if}}

{{description}}

{{#if level}}- **Level:** {{level}}
{{/if}}{{#if start_time}}- **Start time:** {{start_time}}
{{/if}}{{#if end_time}}- **End time:** {{end_time}}
{{/if}}{{#if source}}- **Source:** {{#if source.name}}{{source.name}}{{else}}{{source}}{{/if}}
{{/if}}{{#if source_incident_id}}- **Source incident id:** {{source_incident_id}}
{{/if}}{{#if details_url}}- **Details:** <{{details_url}}>
{{/if}}{{#if tags}}
### Tags

{{#each tags}}- `{{this.tag}}`
{{/each}}{{/if}}{{#if missing_fields}}
### Missing fields

The following label sources had no value on this incident:

{{#each missing_fields}}- `{{this}}`
{{/each}}{{/if}}"#;

/// Renders the markdown description of a GitLab issue from an incident.
pub struct IssueBodyRenderer {
    handlebars: Handlebars<'static>,
}

impl IssueBodyRenderer {
    pub fn new() -> PluginResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(TEMPLATE_NAME, ISSUE_BODY_TEMPLATE)
            .map_err(|err| PluginError::BodyRenderingFailed(err.to_string()))?;
        Ok(Self { handlebars })
    }

    /// The incident fields plus `missing_fields`, rendered as markdown.
    pub fn render(
        &self,
        incident: &SerializedIncident,
        missing_fields: &[String],
    ) -> PluginResult<String> {
        let mut data = incident.fields().clone();
        data.insert(
            "missing_fields".to_string(),
            Value::from(missing_fields.to_vec()),
        );
        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|err| PluginError::BodyRenderingFailed(err.to_string()))
    }
}
