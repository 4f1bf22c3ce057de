pub mod aggregate;
pub mod app_config;
pub mod config;
pub mod settings;
pub mod summary;
pub mod types;
pub mod upload;

pub use aggregate::{aggregate, PlatformAggregate};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use settings::{load_settings, parse_settings, ScrapeFrequency, Settings};
pub use summary::{Dashboard, DashboardSummary, KeywordRow, NOT_AVAILABLE};
pub use types::{Country, Intent, Keyword, Platform, RankingObservation};
pub use upload::{parse_keyword_csv, CsvError, KeywordDraft, CSV_COLUMNS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    #[error("unsupported country code: {0}")]
    UnsupportedCountry(String),

    #[error("invalid keyword: {0}")]
    InvalidKeyword(String),
}
