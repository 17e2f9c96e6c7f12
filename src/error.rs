use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// The single error surfaced to the host. Every message carries the tracker name.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Gitlab: {0}")]
    SettingsInvalid(String),
    #[error(
        "Gitlab: No token can be found in the authentication information. Please update the setting 'TICKET_AUTHENTICATION_SECRET'."
    )]
    AuthMissing,
    #[error(
        "Gitlab: No project namespace and name can be found in the ticket information. Please update the setting 'TICKET_INFORMATION'."
    )]
    ProjectInfoMissing,
    #[error("Gitlab: client could not be created: {0}")]
    ClientConstructionFailed(#[source] GitlabError),
    #[error("Gitlab: project '{project}' could not be resolved: {source}")]
    ProjectResolutionFailed {
        project: String,
        #[source]
        source: GitlabError,
    },
    #[error("Gitlab: project labels could not be listed: {0}")]
    LabelListingFailed(#[source] GitlabError),
    #[error("Gitlab: invalid incident: {0}")]
    InvalidIncident(String),
    #[error("Gitlab: malformed tag '{0}', expected exactly one '=' as in 'key=value'")]
    MalformedTag(String),
    #[error("Gitlab: ticket body could not be rendered: {0}")]
    BodyRenderingFailed(String),
    #[error("Gitlab: ticket could not be created: {0}")]
    IssueCreationFailed(#[source] GitlabError),
}

pub type PluginResult<T> = Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum GitlabError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("token is not a valid header value")]
    InvalidToken,
    #[error("failed to call GitLab: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitLab responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to parse GitLab response: {0}")]
    Decode(String),
}

/// Failures of the base settings loader, before any GitLab-specific checks.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(
        "No endpoint for the ticket system can be found in the settings. Please update the setting 'TICKET_ENDPOINT'."
    )]
    MissingEndpoint,
    #[error(
        "No authentication details for the ticket system can be found in the settings. Please update the setting 'TICKET_AUTHENTICATION_SECRET'."
    )]
    MissingAuthentication,
    #[error(
        "No ticket information can be found in the settings. Please update the setting 'TICKET_INFORMATION'."
    )]
    MissingTicketInformation,
    #[error("The setting '{setting}' is invalid: {reason}")]
    Invalid {
        setting: &'static str,
        reason: String,
    },
    #[error("invalid settings file: {0}")]
    File(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors of the operator CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error("invalid incident: {0}")]
    Incident(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
