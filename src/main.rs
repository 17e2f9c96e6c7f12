mod cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gitlab_ticket::RawSettings;
use gitlab_ticket::error::AppResult;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, CreateArgs};

#[derive(Parser)]
#[command(
    name = "gitlab-ticket",
    author,
    version,
    about = "Open GitLab issues for incidents"
)]
struct Cli {
    /// TOML settings file. TICKET_* environment variables take precedence.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a GitLab issue from a serialized incident and print its URL.
    Create(CreateArgs),
    /// Inspect the ticket settings.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = RawSettings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Config(args) => config_cmd::run(settings, args.command),
        Commands::Create(args) => {
            let url = ticket::run(settings, args).await?;
            println!("{url}");
            Ok(())
        }
    }
}
