//! Per-platform ranking aggregation for the dashboard charts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Platform, RankingObservation};

/// Averages for one platform, recomputed on every data refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformAggregate {
    pub platform: Platform,
    pub observation_count: usize,
    pub avg_position: f64,
    pub avg_visibility: f64,
}

#[derive(Default)]
struct Totals {
    count: usize,
    position_sum: f64,
    visibility_sum: f64,
}

/// Group observations by platform and average position and visibility.
///
/// A missing `position` or `visibility_score` counts as `0` and still counts
/// toward the denominator, so sparse data pulls the averages toward zero.
/// Empty input yields an empty map; every returned entry has at least one
/// observation behind it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(observations: &[RankingObservation]) -> BTreeMap<Platform, PlatformAggregate> {
    let mut totals: BTreeMap<Platform, Totals> = BTreeMap::new();

    for obs in observations {
        let entry = totals.entry(obs.platform.clone()).or_default();
        entry.count += 1;
        entry.position_sum += f64::from(obs.position.unwrap_or(0));
        entry.visibility_sum += obs.visibility_score.unwrap_or(0.0);
    }

    totals
        .into_iter()
        .map(|(platform, t)| {
            let count = t.count as f64;
            let aggregate = PlatformAggregate {
                platform: platform.clone(),
                observation_count: t.count,
                avg_position: t.position_sum / count,
                avg_visibility: t.visibility_sum / count,
            };
            (platform, aggregate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(platform: &str, position: Option<i32>, visibility: Option<f64>) -> RankingObservation {
        RankingObservation {
            id: None,
            keyword_id: 1,
            platform: Platform::from(platform),
            position,
            visibility_score: visibility,
            url: None,
            timestamp: None,
        }
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn google_and_bing_scenario() {
        let result = aggregate(&[
            obs("google", Some(3), Some(80.0)),
            obs("google", Some(5), Some(60.0)),
            obs("bing", Some(10), Some(40.0)),
        ]);

        assert_eq!(result.len(), 2);
        let google = &result[&Platform::Google];
        assert!((google.avg_position - 4.0).abs() < f64::EPSILON);
        assert!((google.avg_visibility - 70.0).abs() < f64::EPSILON);
        assert_eq!(google.observation_count, 2);

        let bing = &result[&Platform::Bing];
        assert!((bing.avg_position - 10.0).abs() < f64::EPSILON);
        assert!((bing.avg_visibility - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_position_counts_as_zero() {
        let result = aggregate(&[
            obs("google", Some(6), Some(50.0)),
            obs("google", None, Some(50.0)),
            obs("google", Some(3), Some(50.0)),
        ]);
        let google = &result[&Platform::Google];
        assert!((google.avg_position - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_visibility_lowers_the_average() {
        let mut observations = vec![
            obs("bing", Some(1), Some(90.0)),
            obs("bing", Some(2), Some(60.0)),
        ];
        let before = aggregate(&observations)[&Platform::Bing].avg_visibility;

        observations.push(obs("bing", Some(3), None));
        let after = aggregate(&observations)[&Platform::Bing].avg_visibility;

        assert!((before - 75.0).abs() < f64::EPSILON);
        assert!((after - 50.0).abs() < f64::EPSILON);
        assert!(after < before);
    }

    #[test]
    fn disjoint_platforms_are_computed_independently() {
        let result = aggregate(&[
            obs("youtube", Some(2), Some(20.0)),
            obs("perplexity", Some(8), Some(10.0)),
            obs("youtube", Some(4), Some(40.0)),
        ]);

        assert_eq!(result.len(), 2);
        assert!((result[&Platform::Youtube].avg_position - 3.0).abs() < f64::EPSILON);
        assert!((result[&Platform::Youtube].avg_visibility - 30.0).abs() < f64::EPSILON);
        assert!((result[&Platform::Perplexity].avg_position - 8.0).abs() < f64::EPSILON);
        assert_eq!(result[&Platform::Perplexity].observation_count, 1);
    }

    #[test]
    fn platform_names_differing_only_in_case_share_a_group() {
        let result = aggregate(&[
            obs("Google", Some(1), Some(100.0)),
            obs("google", Some(3), Some(50.0)),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[&Platform::Google].observation_count, 2);
    }

    #[test]
    fn unknown_platforms_get_their_own_entry() {
        let result = aggregate(&[obs("duckduckgo", Some(4), Some(12.5))]);
        let key = Platform::Other("duckduckgo".to_string());
        assert!((result[&key].avg_visibility - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_platform_names_differing_in_case_or_spacing_share_a_group() {
        let result = aggregate(&[
            obs("DuckDuckGo", Some(2), Some(40.0)),
            obs("duckduckgo", Some(4), Some(20.0)),
            obs("naver ", Some(1), Some(10.0)),
            obs("Naver", Some(3), Some(30.0)),
        ]);
        assert_eq!(result.len(), 2);
        let ddg = &result[&Platform::Other("duckduckgo".to_string())];
        assert_eq!(ddg.observation_count, 2);
        assert!((ddg.avg_position - 3.0).abs() < f64::EPSILON);
        assert_eq!(result[&Platform::Other("naver".to_string())].observation_count, 2);
    }
}
