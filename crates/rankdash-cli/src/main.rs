mod keywords;
mod report;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rankdash_client::RankApiClient;
use tracing_subscriber::EnvFilter;

use crate::keywords::KeywordCommands;
use crate::settings::SettingsCommands;

#[derive(Debug, Parser)]
#[command(name = "rankdash-cli")]
#[command(about = "Keyword ranking dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print summary cards, platform averages and the keyword table
    Dashboard,
    /// List raw ranking observations
    Rankings {
        /// Only show observations for this platform (e.g., google)
        #[arg(long)]
        platform: Option<String>,
    },
    /// Upload a keyword CSV file
    Upload {
        /// Path to the CSV file
        path: PathBuf,
        /// Validate the file without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage tracked keywords
    Keywords {
        #[command(subcommand)]
        command: KeywordCommands,
    },
    /// Validate or save notification settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("rankdash-cli ready; run with --help to list commands");
        return Ok(());
    };

    // Offline commands never touch the remote API or its config.
    match &command {
        Commands::Upload {
            path,
            dry_run: true,
        } => return keywords::run_upload_dry_run(path),
        Commands::Settings {
            command: SettingsCommands::Check { path },
        } => return settings::run_settings_check(path),
        _ => {}
    }

    let config = rankdash_core::load_app_config()?;
    let client = RankApiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build ranking API client: {e}"))?;

    match command {
        Commands::Dashboard => report::run_dashboard(&client).await,
        Commands::Rankings { platform } => {
            report::run_rankings(&client, platform.as_deref()).await
        }
        Commands::Upload { path, .. } => keywords::run_upload(&client, &path).await,
        Commands::Keywords { command } => keywords::run_keywords(&client, command).await,
        Commands::Settings { command } => settings::run_settings(&client, command).await,
    }
}
