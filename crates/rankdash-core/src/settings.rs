//! Notification and API-key settings.
//!
//! The settings form is edited locally and persisted by the remote API. API
//! keys are opaque strings here: they are carried to the remote API and never
//! printed.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Country;
use crate::ConfigError;

const REDACTED: &str = "[redacted]";

/// Inclusive bounds for the alert position-drop threshold.
pub const ALERT_THRESHOLD_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for ScrapeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeFrequency::Hourly => write!(f, "hourly"),
            ScrapeFrequency::Daily => write!(f, "daily"),
            ScrapeFrequency::Weekly => write!(f, "weekly"),
            ScrapeFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scrape_frequency: ScrapeFrequency,
    pub email_notifications: bool,
    pub slack_notifications: bool,
    pub whatsapp_notifications: bool,
    /// A blank address means no email is configured.
    #[serde(deserialize_with = "blank_as_none")]
    pub notification_email: Option<String>,
    /// Position drop that triggers an alert.
    pub alert_threshold: u32,
    pub country_code: Country,
    pub api_key: Option<String>,
    pub serp_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scrape_frequency: ScrapeFrequency::Daily,
            email_notifications: true,
            slack_notifications: false,
            whatsapp_notifications: false,
            notification_email: None,
            alert_threshold: 5,
            country_code: Country::Us,
            api_key: None,
            serp_api_key: None,
            openai_api_key: None,
            gemini_api_key: None,
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn redact(key: Option<&String>) -> Option<&'static str> {
    key.filter(|k| !k.is_empty()).map(|_| REDACTED)
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("scrape_frequency", &self.scrape_frequency)
            .field("email_notifications", &self.email_notifications)
            .field("slack_notifications", &self.slack_notifications)
            .field("whatsapp_notifications", &self.whatsapp_notifications)
            .field("notification_email", &self.notification_email)
            .field("alert_threshold", &self.alert_threshold)
            .field("country_code", &self.country_code)
            .field("api_key", &redact(self.api_key.as_ref()))
            .field("serp_api_key", &redact(self.serp_api_key.as_ref()))
            .field("openai_api_key", &redact(self.openai_api_key.as_ref()))
            .field("gemini_api_key", &redact(self.gemini_api_key.as_ref()))
            .finish()
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the alert threshold is out of
    /// range or the notification email is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALERT_THRESHOLD_RANGE.contains(&self.alert_threshold) {
            return Err(ConfigError::Validation(format!(
                "alert threshold {} is out of range; must be between {} and {}",
                self.alert_threshold,
                ALERT_THRESHOLD_RANGE.start(),
                ALERT_THRESHOLD_RANGE.end()
            )));
        }

        if let Some(email) = self
            .notification_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
        {
            let valid = email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "notification email '{email}' is not a valid address"
                )));
            }
        }

        Ok(())
    }

    /// Copy with every present API key replaced by a placeholder.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |key: Option<&String>| redact(key).map(str::to_owned);
        Self {
            api_key: mask(self.api_key.as_ref()),
            serp_api_key: mask(self.serp_api_key.as_ref()),
            openai_api_key: mask(self.openai_api_key.as_ref()),
            gemini_api_key: mask(self.gemini_api_key.as_ref()),
            ..self.clone()
        }
    }
}

/// Parse and validate settings from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::SettingsFileParse`] on malformed YAML or
/// [`ConfigError::Validation`] if the values are out of range.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings =
        serde_yaml::from_str(content).map_err(ConfigError::SettingsFileParse)?;
    settings.validate()?;
    Ok(settings)
}

/// Load and validate settings from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_settings(&content)
}
