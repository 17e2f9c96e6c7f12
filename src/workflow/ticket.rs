use tracing::{error, info};

use crate::config::TicketInformation;
use crate::domain::body::IssueBodyRenderer;
use crate::domain::incident::SerializedIncident;
use crate::domain::labels::get_labels;
use crate::domain::ticket::{IssueDraft, existing_labels};
use crate::error::{PluginError, PluginResult};
use crate::services::IssueTracker;

/// Resolves the project, maps the incident to labels and a body, opens the
/// issue and returns its web URL. Stops at the first failure.
pub async fn create_ticket_with(
    tracker: &dyn IssueTracker,
    information: &TicketInformation,
    incident: &SerializedIncident,
) -> PluginResult<String> {
    let Some(title) = incident.description() else {
        let err = PluginError::InvalidIncident(
            "'description' must be a non-empty string".to_string(),
        );
        error!("{err}");
        return Err(err);
    };

    let project_path = information.project_namespace_and_name.as_str();
    let project = tracker.find_project(project_path).await.map_err(|source| {
        error!(project = project_path, error = %source, "Gitlab: project could not be resolved");
        PluginError::ProjectResolutionFailed {
            project: project_path.to_string(),
            source,
        }
    })?;

    let selection = get_labels(information, incident).inspect_err(|err| {
        error!(error = %err, "Gitlab: labels could not be derived from the incident");
    })?;

    let catalog = tracker.list_labels(&project).await.map_err(|source| {
        error!(project = project_path, error = %source, "Gitlab: project labels could not be listed");
        PluginError::LabelListingFailed(source)
    })?;
    let labels = existing_labels(&catalog, &selection.labels);

    let description = IssueBodyRenderer::new()
        .and_then(|renderer| renderer.render(incident, &selection.missing_fields))
        .inspect_err(|err| {
            error!(error = %err, "Gitlab: ticket body could not be rendered");
        })?;

    let draft = IssueDraft {
        title: title.to_string(),
        description,
        labels,
    };

    let issue = tracker
        .create_issue(&project, &draft)
        .await
        .map_err(|source| {
            error!(project = project_path, error = %source, "Gitlab: ticket could not be created");
            PluginError::IssueCreationFailed(source)
        })?;

    info!(
        project = project_path,
        iid = ?issue.iid,
        url = %issue.web_url,
        missing_fields = ?selection.missing_fields,
        "Gitlab: ticket created"
    );
    Ok(issue.web_url)
}
