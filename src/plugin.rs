use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use crate::config::{RawSettings, TicketInformation, TicketSettings};
use crate::domain::incident::SerializedIncident;
use crate::error::{PluginError, PluginResult};
use crate::infra::gitlab::GitlabClient;
use crate::services::TicketPlugin;
use crate::workflow::ticket::create_ticket_with;

/// Lets the incident server open tickets in GitLab.
///
/// Holds the host's settings untouched; they are validated again on every
/// ticket creation and each creation uses a fresh client.
#[derive(Debug, Clone)]
pub struct GitlabPlugin {
    settings: RawSettings,
}

impl GitlabPlugin {
    pub fn new(settings: RawSettings) -> Self {
        Self { settings }
    }

    pub fn create_client(endpoint: &str, token: &str) -> PluginResult<GitlabClient> {
        GitlabClient::new(endpoint, token).map_err(|err| {
            error!(endpoint, error = %err, "Gitlab: client could not be created");
            PluginError::ClientConstructionFailed(err)
        })
    }
}

#[async_trait]
impl TicketPlugin for GitlabPlugin {
    fn import_settings(&self) -> PluginResult<TicketSettings> {
        let (endpoint, authentication, ticket_information) =
            self.settings.to_parts().map_err(|err| {
                error!(error = %err, "could not import settings for ticket plugin");
                PluginError::SettingsInvalid(err.to_string())
            })?;

        let Some(token) = authentication.get("token") else {
            let err = PluginError::AuthMissing;
            error!("{err}");
            return Err(err);
        };

        if !ticket_information.contains_key("project_namespace_and_name") {
            let err = PluginError::ProjectInfoMissing;
            error!("{err}");
            return Err(err);
        }

        let ticket_information: TicketInformation =
            serde_json::from_value(Value::Object(ticket_information)).map_err(|err| {
                let err = PluginError::SettingsInvalid(format!(
                    "The setting 'TICKET_INFORMATION' is invalid: {err}"
                ));
                error!("{err}");
                err
            })?;

        Ok(TicketSettings {
            endpoint,
            token: token.clone(),
            ticket_information,
        })
    }

    async fn create_ticket(&self, incident: &SerializedIncident) -> PluginResult<String> {
        let settings = self.import_settings()?;
        let client = Self::create_client(&settings.endpoint, &settings.token)?;
        create_ticket_with(&client, &settings.ticket_information, incident).await
    }
}
