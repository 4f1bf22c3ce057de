//! Dashboard summary cards and the keyword performance table.
//!
//! [`Dashboard::build`] is the single entry point the server and CLI use: it
//! runs [`aggregate`] once and derives every other card from the same
//! snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, PlatformAggregate};
use crate::types::{Keyword, Platform, RankingObservation};

/// Placeholder rendered wherever a value is not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// The headline cards above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_keywords: usize,
    pub observation_count: usize,
    /// `None` when there are no observations at all.
    pub avg_position: Option<f64>,
    /// `None` when there are no observations at all.
    pub avg_visibility: Option<f64>,
    pub top_platform: Option<Platform>,
}

/// One row of the keyword performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRow {
    pub keyword_id: i64,
    pub keyword: String,
    pub volume: Option<i64>,
    pub difficulty: Option<f64>,
    pub google_position: Option<i32>,
    pub google_visibility: Option<f64>,
}

/// Everything the dashboard page renders, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub platforms: Vec<PlatformAggregate>,
    pub keywords: Vec<KeywordRow>,
}

impl Dashboard {
    #[must_use]
    pub fn build(keywords: &[Keyword], observations: &[RankingObservation]) -> Self {
        let by_platform = aggregate(observations);
        let summary = DashboardSummary {
            total_keywords: keywords.len(),
            observation_count: observations.len(),
            avg_position: overall_average_position(observations),
            avg_visibility: overall_average_visibility(observations),
            top_platform: top_platform(&by_platform),
        };

        Self {
            summary,
            platforms: by_platform.into_values().collect(),
            keywords: keyword_rows(keywords, observations),
        }
    }
}

/// Mean position across every observation, null counted as `0`.
#[must_use]
pub fn overall_average_position(observations: &[RankingObservation]) -> Option<f64> {
    mean_or_none(observations, |o| f64::from(o.position.unwrap_or(0)))
}

/// Mean visibility across every observation, null counted as `0`.
#[must_use]
pub fn overall_average_visibility(observations: &[RankingObservation]) -> Option<f64> {
    mean_or_none(observations, |o| o.visibility_score.unwrap_or(0.0))
}

#[allow(clippy::cast_precision_loss)]
fn mean_or_none<F>(observations: &[RankingObservation], value: F) -> Option<f64>
where
    F: Fn(&RankingObservation) -> f64,
{
    if observations.is_empty() {
        return None;
    }
    let sum: f64 = observations.iter().map(value).sum();
    Some(sum / observations.len() as f64)
}

/// Platform with the highest average visibility; the earliest platform wins ties.
#[must_use]
pub fn top_platform(aggregates: &BTreeMap<Platform, PlatformAggregate>) -> Option<Platform> {
    aggregates
        .values()
        .fold(None::<&PlatformAggregate>, |best, candidate| match best {
            Some(b) if b.avg_visibility >= candidate.avg_visibility => Some(b),
            _ => Some(candidate),
        })
        .map(|agg| agg.platform.clone())
}

/// First Google observation for `keyword_id`, by linear scan.
#[must_use]
pub fn google_observation(
    keyword_id: i64,
    observations: &[RankingObservation],
) -> Option<&RankingObservation> {
    observations
        .iter()
        .find(|o| o.keyword_id == keyword_id && o.platform == Platform::Google)
}

#[must_use]
pub fn keyword_rows(keywords: &[Keyword], observations: &[RankingObservation]) -> Vec<KeywordRow> {
    keywords
        .iter()
        .map(|kw| {
            let google = google_observation(kw.id, observations);
            KeywordRow {
                keyword_id: kw.id,
                keyword: kw.keyword.clone(),
                volume: kw.volume,
                difficulty: kw.difficulty,
                google_position: google.and_then(|o| o.position),
                google_visibility: google.and_then(|o| o.visibility_score),
            }
        })
        .collect()
}

/// Display label for an observation's keyword, falling back to `keyword:<id>`
/// when the reference is orphaned.
#[must_use]
pub fn keyword_label(keywords: &[Keyword], keyword_id: i64) -> String {
    keywords
        .iter()
        .find(|k| k.id == keyword_id)
        .map_or_else(|| format!("keyword:{keyword_id}"), |k| k.keyword.clone())
}

/// One decimal place, or [`NOT_AVAILABLE`].
#[must_use]
pub fn fmt_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}"))
}

/// One decimal place with a percent sign, or [`NOT_AVAILABLE`].
#[must_use]
pub fn fmt_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}%"))
}

/// Display form of any optional value, or [`NOT_AVAILABLE`].
#[must_use]
pub fn fmt_or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
