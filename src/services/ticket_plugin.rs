use async_trait::async_trait;

use crate::config::TicketSettings;
use crate::domain::incident::SerializedIncident;
use crate::error::PluginResult;

/// What the incident server expects from a ticket plugin.
#[async_trait]
pub trait TicketPlugin: Send + Sync {
    fn import_settings(&self) -> PluginResult<TicketSettings>;

    /// Opens a ticket for the incident and returns its URL.
    async fn create_ticket(&self, incident: &SerializedIncident) -> PluginResult<String>;
}
