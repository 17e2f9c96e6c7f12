use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::Value;

use gitlab_ticket::error::{AppError, AppResult};
use gitlab_ticket::{GitlabPlugin, RawSettings, SerializedIncident, TicketPlugin};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Serialized incident as JSON; '-' reads standard input.
    #[arg(short, long, default_value = "-")]
    pub incident: PathBuf,
}

pub async fn run(settings: RawSettings, args: CreateArgs) -> AppResult<String> {
    let raw = read_input(&args.incident)?;
    let incident = parse_incident(&raw)?;
    let plugin = GitlabPlugin::new(settings);
    Ok(plugin.create_ticket(&incident).await?)
}

fn read_input(path: &Path) -> AppResult<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn parse_incident(raw: &str) -> AppResult<SerializedIncident> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| AppError::Incident(err.to_string()))?;
    SerializedIncident::from_value(value).map_err(AppError::Incident)
}
