use clap::{Args, Subcommand};

use gitlab_ticket::error::AppResult;
use gitlab_ticket::{GitlabPlugin, RawSettings, TicketPlugin};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective ticket settings (secrets masked).
    Show,
    /// Validate the ticket settings without contacting GitLab.
    Check,
}

pub fn run(settings: RawSettings, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", render_show(&settings));
            Ok(())
        }
        ConfigCommand::Check => run_check(settings),
    }
}

fn render_show(settings: &RawSettings) -> String {
    let mut lines = vec![format!(
        "Endpoint: {}",
        display_value(&settings.endpoint)
    )];

    match &settings.authentication {
        Some(authentication) if !authentication.is_empty() => {
            lines.push("Authentication:".to_string());
            for (key, value) in authentication {
                lines.push(format!("  {key}: {}", mask_secret(value)));
            }
        }
        _ => lines.push("Authentication: <not set>".to_string()),
    }

    match &settings.ticket_information {
        Some(information) => {
            lines.push("Ticket information:".to_string());
            let pretty = serde_json::to_string_pretty(information)
                .unwrap_or_else(|_| "<unprintable>".to_string());
            lines.extend(pretty.lines().map(|line| format!("  {line}")));
        }
        None => lines.push("Ticket information: <not set>".to_string()),
    }

    lines.join("\n")
}

fn run_check(settings: RawSettings) -> AppResult<()> {
    let plugin = GitlabPlugin::new(settings);
    let imported = plugin.import_settings()?;
    GitlabPlugin::create_client(&imported.endpoint, &imported.token)?;

    let information = &imported.ticket_information;
    println!("Settings are valid.");
    println!("Project: {}", information.project_namespace_and_name);
    println!("Static labels: {}", information.labels_set.len());
    println!("Mapped labels: {}", information.labels_mapping.len());
    Ok(())
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &str) -> String {
    match value.chars().count() {
        0 => "<empty>".to_string(),
        n if n > 8 => {
            let prefix: String = value.chars().take(3).collect();
            let suffix: String = value.chars().skip(n - 3).collect();
            format!("{prefix}***{suffix}")
        }
        _ => "***".to_string(),
    }
}
