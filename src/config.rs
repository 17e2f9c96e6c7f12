use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SettingsError;

pub const ENDPOINT_VAR: &str = "TICKET_ENDPOINT";
pub const AUTHENTICATION_VAR: &str = "TICKET_AUTHENTICATION_SECRET";
pub const TICKET_INFORMATION_VAR: &str = "TICKET_INFORMATION";

/// Ticket settings as handed over by the host, before any validation.
///
/// Built once (from a TOML file, the environment, or directly by the host)
/// and injected into the plugin.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub authentication: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub ticket_information: Option<Map<String, Value>>,
}

impl RawSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        toml::from_str(contents).map_err(|err| SettingsError::File(err.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the three `TICKET_*` variables through `lookup`. The two mappings
    /// are JSON objects.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_VAR);
        let authentication = lookup(AUTHENTICATION_VAR)
            .map(|raw| {
                serde_json::from_str::<BTreeMap<String, String>>(&raw).map_err(|err| {
                    SettingsError::Invalid {
                        setting: AUTHENTICATION_VAR,
                        reason: err.to_string(),
                    }
                })
            })
            .transpose()?;
        let ticket_information = lookup(TICKET_INFORMATION_VAR)
            .map(|raw| {
                serde_json::from_str::<Map<String, Value>>(&raw).map_err(|err| {
                    SettingsError::Invalid {
                        setting: TICKET_INFORMATION_VAR,
                        reason: err.to_string(),
                    }
                })
            })
            .transpose()?;

        Ok(Self {
            endpoint,
            authentication,
            ticket_information,
        })
    }

    /// Settings file (if any) overridden by the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let base = match file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.merge(Self::from_env()?))
    }

    /// Values set in `overrides` replace those in `self`, setting by setting.
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            endpoint: overrides.endpoint.or(self.endpoint),
            authentication: overrides.authentication.or(self.authentication),
            ticket_information: overrides.ticket_information.or(self.ticket_information),
        }
    }

    /// The base loader: every setting must be present.
    pub fn to_parts(
        &self,
    ) -> Result<(String, BTreeMap<String, String>, Map<String, Value>), SettingsError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or(SettingsError::MissingEndpoint)?;
        let authentication = self
            .authentication
            .clone()
            .ok_or(SettingsError::MissingAuthentication)?;
        let ticket_information = self
            .ticket_information
            .clone()
            .ok_or(SettingsError::MissingTicketInformation)?;
        Ok((endpoint.to_string(), authentication, ticket_information))
    }
}

impl fmt::Debug for RawSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authentication_keys = self
            .authentication
            .as_ref()
            .map(|auth| auth.keys().cloned().collect::<Vec<_>>());
        f.debug_struct("RawSettings")
            .field("endpoint", &self.endpoint)
            .field("authentication_keys", &authentication_keys)
            .field("ticket_information", &self.ticket_information)
            .finish()
    }
}

/// One `labels_mapping` entry: either an incident field name, or `{ tag = "<key>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelSource {
    ByField(String),
    ByTag { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketInformation {
    pub project_namespace_and_name: String,
    #[serde(default)]
    pub labels_set: Vec<String>,
    #[serde(default)]
    pub labels_mapping: Vec<LabelSource>,
}

/// Validated settings for one ticket creation.
#[derive(Clone)]
pub struct TicketSettings {
    pub endpoint: String,
    pub token: String,
    pub ticket_information: TicketInformation,
}

impl fmt::Debug for TicketSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketSettings")
            .field("endpoint", &self.endpoint)
            .field("token", &"****")
            .field("ticket_information", &self.ticket_information)
            .finish()
    }
}
