//! Wire types shared with the remote ranking API.
//!
//! Everything here is read-only from this workspace's point of view: keywords
//! and ranking observations are produced by the remote collection process and
//! only ever fetched, never edited in place.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A search engine or ranking source under which a keyword is tracked.
///
/// Every wire name is trimmed and lowercased before matching, so names that
/// differ only in case or surrounding whitespace are the same platform. Names
/// outside the known set are kept, normalised, in [`Platform::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Google,
    Bing,
    Youtube,
    GoogleAi,
    Gemini,
    Chatgpt,
    Perplexity,
    Other(String),
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Google => "google",
            Platform::Bing => "bing",
            Platform::Youtube => "youtube",
            Platform::GoogleAi => "google_ai",
            Platform::Gemini => "gemini",
            Platform::Chatgpt => "chatgpt",
            Platform::Perplexity => "perplexity",
            Platform::Other(name) => name,
        }
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        let name = raw.trim().to_ascii_lowercase();
        match name.as_str() {
            "google" => Platform::Google,
            "bing" => Platform::Bing,
            "youtube" => Platform::Youtube,
            "google_ai" => Platform::GoogleAi,
            "gemini" => Platform::Gemini,
            "chatgpt" => Platform::Chatgpt,
            "perplexity" => Platform::Perplexity,
            _ => Platform::Other(name),
        }
    }
}

impl From<&str> for Platform {
    fn from(raw: &str) -> Self {
        Platform::from(raw.to_owned())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_owned()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked keyword as returned by `GET /api/keywords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub search_country: Option<String>,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    /// Kept as free text: the remote API does not constrain it.
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One keyword's rank on one platform, as returned by `GET /api/rankings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingObservation {
    #[serde(default)]
    pub id: Option<i64>,
    /// May reference a keyword that no longer exists.
    pub keyword_id: i64,
    pub platform: Platform,
    #[serde(default)]
    pub position: Option<i32>,
    /// 0-100 estimated click-through exposure.
    #[serde(default)]
    pub visibility_score: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Search intent attached to a keyword draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Informational,
    Commercial,
    Transactional,
    Navigational,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Informational => write!(f, "informational"),
            Intent::Commercial => write!(f, "commercial"),
            Intent::Transactional => write!(f, "transactional"),
            Intent::Navigational => write!(f, "navigational"),
        }
    }
}

impl FromStr for Intent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "informational" => Ok(Intent::Informational),
            "commercial" => Ok(Intent::Commercial),
            "transactional" => Ok(Intent::Transactional),
            "navigational" => Ok(Intent::Navigational),
            other => Err(CoreError::InvalidIntent(other.to_owned())),
        }
    }
}

/// Search country a keyword is tracked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    #[default]
    Us,
    Uk,
    Ca,
    Au,
    De,
    Fr,
    Jp,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Country::Us => "us",
            Country::Uk => "uk",
            Country::Ca => "ca",
            Country::Au => "au",
            Country::De => "de",
            Country::Fr => "fr",
            Country::Jp => "jp",
        };
        f.write_str(code)
    }
}

impl FromStr for Country {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Country::Us),
            "uk" => Ok(Country::Uk),
            "ca" => Ok(Country::Ca),
            "au" => Ok(Country::Au),
            "de" => Ok(Country::De),
            "fr" => Ok(Country::Fr),
            "jp" => Ok(Country::Jp),
            other => Err(CoreError::UnsupportedCountry(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_known_names_case_insensitively() {
        assert_eq!(Platform::from("Google"), Platform::Google);
        assert_eq!(Platform::from(" BING "), Platform::Bing);
        assert_eq!(Platform::from("google_ai"), Platform::GoogleAi);
    }

    #[test]
    fn platform_normalises_unknown_names_like_known_ones() {
        let platform = Platform::from("DuckDuckGo");
        assert_eq!(platform, Platform::Other("duckduckgo".to_string()));
        assert_eq!(platform.to_string(), "duckduckgo");
        assert_eq!(Platform::from("Naver "), Platform::from("naver"));
        assert_eq!(Platform::from("Naver ").as_str(), "naver");
    }

    #[test]
    fn ranking_observation_tolerates_null_fields() {
        let obs: RankingObservation = serde_json::from_value(serde_json::json!({
            "keyword_id": 7,
            "platform": "youtube",
            "position": null,
            "visibility_score": null
        }))
        .expect("observation should parse");
        assert_eq!(obs.platform, Platform::Youtube);
        assert!(obs.position.is_none());
        assert!(obs.visibility_score.is_none());
        assert!(obs.timestamp.is_none());
    }

    #[test]
    fn platform_serializes_as_wire_name() {
        let json = serde_json::to_string(&Platform::GoogleAi).expect("serialize");
        assert_eq!(json, "\"google_ai\"");
    }

    #[test]
    fn keyword_parses_minimal_payload() {
        let kw: Keyword = serde_json::from_value(serde_json::json!({
            "id": 1,
            "keyword": "best seo tools"
        }))
        .expect("keyword should parse");
        assert_eq!(kw.keyword, "best seo tools");
        assert!(kw.volume.is_none());
        assert!(kw.target_url.is_none());
    }

    #[test]
    fn country_rejects_unsupported_code() {
        let err = "br".parse::<Country>().unwrap_err();
        assert!(err.to_string().contains("br"));
    }

    #[test]
    fn intent_round_trips_through_display() {
        let intent: Intent = "Commercial".parse().expect("intent");
        assert_eq!(intent, Intent::Commercial);
        assert_eq!(intent.to_string(), "commercial");
    }
}
