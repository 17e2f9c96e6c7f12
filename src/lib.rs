//! Opens GitLab issues for incidents handed over by an incident-management server.
//!
//! [`GitlabPlugin`] implements the host's [`TicketPlugin`] contract: settings
//! are validated, a GitLab client is built from the endpoint and token, the
//! incident is mapped to labels and a markdown body, and the URL of the
//! created issue is returned.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod plugin;
pub mod services;
pub mod workflow;

pub use config::{LabelSource, RawSettings, TicketInformation, TicketSettings};
pub use domain::incident::SerializedIncident;
pub use domain::labels::{LabelSelection, convert_tags_to_dict, get_labels};
pub use error::{GitlabError, PluginError, PluginResult};
pub use plugin::GitlabPlugin;
pub use services::{IssueTracker, TicketPlugin};
