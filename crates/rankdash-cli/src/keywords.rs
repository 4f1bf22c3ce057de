//! Keyword upload and manual entry.

use std::path::Path;

use clap::Subcommand;
use rankdash_client::RankApiClient;
use rankdash_core::{parse_keyword_csv, Country, Intent, KeywordDraft};

#[derive(Debug, Subcommand)]
pub enum KeywordCommands {
    /// Add a single keyword
    Add {
        /// Keyword text to track
        keyword: String,
        /// Page expected to rank for the keyword
        #[arg(long)]
        target_url: String,
        /// Search country code (us, uk, ca, au, de, fr, jp)
        #[arg(long, default_value = "us")]
        country: Country,
        /// Monthly search volume
        #[arg(long)]
        volume: Option<u64>,
        /// Keyword difficulty, 0-100
        #[arg(long)]
        difficulty: Option<f64>,
        /// Cost per click
        #[arg(long)]
        cpc: Option<f64>,
        /// Search intent (informational, navigational, commercial, transactional)
        #[arg(long)]
        intent: Option<Intent>,
    },
}

fn read_upload(path: &Path) -> anyhow::Result<(String, String)> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok((file_name, text))
}

/// Validate an upload file locally and print what would be sent.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails CSV validation.
pub(crate) fn run_upload_dry_run(path: &Path) -> anyhow::Result<()> {
    let (file_name, text) = read_upload(path)?;
    let drafts = parse_keyword_csv(&text)?;

    println!("dry-run: {file_name} is valid; would upload {} keywords", drafts.len());
    for draft in &drafts {
        println!(
            "  {:<40}{:<4}{}",
            draft.keyword,
            draft.search_country.to_string(),
            draft.target_url
        );
    }
    Ok(())
}

/// Upload a keyword CSV file to the ranking API.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails validation, or the
/// upload request fails.
pub(crate) async fn run_upload(client: &RankApiClient, path: &Path) -> anyhow::Result<()> {
    let (file_name, text) = read_upload(path)?;
    let receipt = client.upload_keywords(&file_name, text).await?;

    if !receipt.success {
        anyhow::bail!("upload of {file_name} was rejected: {}", receipt.message);
    }
    println!("{}", receipt.message);
    Ok(())
}

pub(crate) async fn run_keywords(
    client: &RankApiClient,
    command: KeywordCommands,
) -> anyhow::Result<()> {
    match command {
        KeywordCommands::Add {
            keyword,
            target_url,
            country,
            volume,
            difficulty,
            cpc,
            intent,
        } => {
            let draft = KeywordDraft {
                keyword,
                target_url,
                search_country: country,
                volume,
                difficulty,
                cpc,
                intent,
            };
            let created = client.create_keyword(&draft).await?;
            tracing::info!(keyword_id = created.id, "keyword created");
            println!("added keyword '{}' (id {})", created.keyword, created.id);
            Ok(())
        }
    }
}
