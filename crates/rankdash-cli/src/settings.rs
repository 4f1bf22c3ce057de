//! Settings file validation and save.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use rankdash_client::RankApiClient;
use rankdash_core::{load_settings, Settings};

#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Validate a YAML settings file without sending it
    Check {
        /// Path to the settings file
        path: PathBuf,
    },
    /// Validate a YAML settings file and save it to the ranking API
    Push {
        /// Path to the settings file
        path: PathBuf,
    },
}

fn print_settings(settings: &Settings) {
    let masked = settings.redacted();
    println!("scrape frequency:   {}", masked.scrape_frequency);
    println!(
        "notifications:      email={} slack={} whatsapp={}",
        masked.email_notifications, masked.slack_notifications, masked.whatsapp_notifications
    );
    println!(
        "notification email: {}",
        masked.notification_email.as_deref().unwrap_or("-")
    );
    println!("alert threshold:    {}", masked.alert_threshold);
    println!("country:            {}", masked.country_code);
    for (name, key) in [
        ("api key", &masked.api_key),
        ("serp api key", &masked.serp_api_key),
        ("openai api key", &masked.openai_api_key),
        ("gemini api key", &masked.gemini_api_key),
    ] {
        println!("{:<20}{}", format!("{name}:"), key.as_deref().unwrap_or("not set"));
    }
}

/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub(crate) fn run_settings_check(path: &Path) -> anyhow::Result<()> {
    let settings = load_settings(path)?;
    println!("{} is valid", path.display());
    print_settings(&settings);
    Ok(())
}

pub(crate) async fn run_settings(
    client: &RankApiClient,
    command: SettingsCommands,
) -> anyhow::Result<()> {
    match command {
        SettingsCommands::Check { path } => run_settings_check(&path),
        SettingsCommands::Push { path } => {
            let settings = load_settings(&path)?;
            client.save_settings(&settings).await?;
            println!("settings saved");
            print_settings(&settings);
            Ok(())
        }
    }
}
