//! Read-only dashboard and ranking views.
//!
//! Both commands load one snapshot from the ranking API and render it as
//! fixed-width text tables. An unreachable API renders as an empty dashboard,
//! the same as the web view.

use std::fmt::Write as _;

use rankdash_client::{load_snapshot, RankApiClient};
use rankdash_core::summary::{fmt_decimal, fmt_or_na, fmt_percent, keyword_label};
use rankdash_core::{Dashboard, Keyword, Platform, RankingObservation, NOT_AVAILABLE};

/// Print the summary cards, per-platform averages and keyword table.
///
/// # Errors
///
/// Never fails today; the signature matches the other command handlers.
pub(crate) async fn run_dashboard(client: &RankApiClient) -> anyhow::Result<()> {
    let snapshot = load_snapshot(client).await;
    print!("{}", render_dashboard(&snapshot.dashboard()));
    Ok(())
}

/// Print every ranking observation, optionally filtered to one platform.
///
/// # Errors
///
/// Never fails today; the signature matches the other command handlers.
pub(crate) async fn run_rankings(
    client: &RankApiClient,
    platform: Option<&str>,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(client).await;
    let filter = platform.map(Platform::from);
    let rankings: Vec<&RankingObservation> = snapshot
        .rankings
        .iter()
        .filter(|o| filter.as_ref().is_none_or(|p| &o.platform == p))
        .collect();

    if rankings.is_empty() {
        println!(
            "no ranking observations found{}",
            platform
                .map(|p| format!(" for platform {p}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    print!("{}", render_rankings(&snapshot.keywords, &rankings));
    Ok(())
}

pub(crate) fn render_dashboard(dashboard: &Dashboard) -> String {
    let summary = &dashboard.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Total Keywords:   {}", summary.total_keywords);
    let _ = writeln!(out, "Avg. Position:    {}", fmt_decimal(summary.avg_position));
    let _ = writeln!(out, "Avg. Visibility:  {}", fmt_percent(summary.avg_visibility));
    let _ = writeln!(
        out,
        "Top Platform:     {}",
        summary
            .top_platform
            .as_ref()
            .map_or(NOT_AVAILABLE, Platform::as_str)
    );
    let _ = writeln!(out);

    if dashboard.platforms.is_empty() {
        let _ = writeln!(out, "no ranking data yet; upload keywords to start tracking");
    } else {
        let _ = writeln!(
            out,
            "{:<14}{:>8}{:>14}{:>16}",
            "PLATFORM", "OBS", "AVG POSITION", "AVG VISIBILITY"
        );
        for agg in &dashboard.platforms {
            let _ = writeln!(
                out,
                "{:<14}{:>8}{:>14.1}{:>15.1}%",
                agg.platform.as_str(),
                agg.observation_count,
                agg.avg_position,
                agg.avg_visibility
            );
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<40}{:>10}{:>12}{:>10}{:>12}",
        "KEYWORD", "VOLUME", "DIFFICULTY", "GOOGLE", "VISIBILITY"
    );
    for row in &dashboard.keywords {
        let _ = writeln!(
            out,
            "{:<40}{:>10}{:>12}{:>10}{:>12}",
            truncate(&row.keyword, 38),
            fmt_or_na(row.volume),
            fmt_or_na(row.difficulty),
            fmt_or_na(row.google_position),
            fmt_percent(row.google_visibility)
        );
    }

    out
}

pub(crate) fn render_rankings(keywords: &[Keyword], rankings: &[&RankingObservation]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40}{:<14}{:>10}{:>12}  URL",
        "KEYWORD", "PLATFORM", "POSITION", "VISIBILITY"
    );
    for obs in rankings {
        let _ = writeln!(
            out,
            "{:<40}{:<14}{:>10}{:>12}  {}",
            truncate(&keyword_label(keywords, obs.keyword_id), 38),
            obs.platform.as_str(),
            fmt_or_na(obs.position),
            fmt_percent(obs.visibility_score),
            obs.url.as_deref().unwrap_or(NOT_AVAILABLE)
        );
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
