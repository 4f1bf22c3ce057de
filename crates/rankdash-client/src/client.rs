//! HTTP client for the remote ranking API.
//!
//! Wraps `reqwest` with typed responses for the keyword and ranking reads and
//! the three writes the dashboard performs: CSV upload, manual keyword entry
//! and settings save. Every non-2xx status surfaces as
//! [`ClientError::UnexpectedStatus`]. Requests are never retried.

use std::time::Duration;

use rankdash_core::{parse_keyword_csv, AppConfig, Keyword, KeywordDraft, RankingObservation, Settings};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

const KEYWORDS_PATH: &str = "api/keywords";
const RANKINGS_PATH: &str = "api/rankings";
const UPLOAD_PATH: &str = "api/upload-keywords";
const SETTINGS_PATH: &str = "api/settings";

/// Outcome of a keyword upload as reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    pub message: String,
    pub keyword_count: usize,
}

/// Upload response body; every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    success: Option<bool>,
    message: Option<String>,
    keyword_count: Option<usize>,
}

/// Client for the remote ranking API.
///
/// Use [`RankApiClient::from_config`] in the binaries or
/// [`RankApiClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct RankApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RankApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Builds a client from the application config, including its bearer token.
    ///
    /// # Errors
    ///
    /// See [`RankApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        Ok(client.with_token(config.api_token.clone()))
    }

    /// Sends `Authorization: Bearer <token>` on every request when set.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// `GET /api/keywords`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a keyword array.
    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, ClientError> {
        self.get_json(KEYWORDS_PATH).await
    }

    /// `GET /api/rankings`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not an observation array.
    pub async fn list_rankings(&self) -> Result<Vec<RankingObservation>, ClientError> {
        self.get_json(RANKINGS_PATH).await
    }

    /// Validates `draft` and creates it via `POST /api/keywords`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidKeyword`] without sending anything if the
    /// draft fails validation; otherwise the same errors as [`Self::list_keywords`].
    pub async fn create_keyword(&self, draft: &KeywordDraft) -> Result<Keyword, ClientError> {
        draft.validate()?;
        let url = self.endpoint(KEYWORDS_PATH)?;
        let response = self
            .authorize(self.client.post(url.clone()))
            .json(draft)
            .send()
            .await?;
        let body = Self::checked_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: format!("create keyword '{}'", draft.keyword),
            source: e,
        })
    }

    /// Validates an upload file locally, then posts it as multipart form
    /// field `file` to `POST /api/upload-keywords`.
    ///
    /// A file that fails validation is never sent. When the remote API omits
    /// the keyword count or message, the locally parsed row count fills in.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUpload`] if the CSV fails validation.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport
    ///   or status failures.
    /// - [`ClientError::Deserialize`] if a non-empty response body is not JSON.
    pub async fn upload_keywords(
        &self,
        file_name: &str,
        csv: String,
    ) -> Result<UploadReceipt, ClientError> {
        let drafts = parse_keyword_csv(&csv)?;
        let url = self.endpoint(UPLOAD_PATH)?;

        let part = Part::text(csv)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        tracing::info!(file_name, rows = drafts.len(), "uploading keyword file");
        let response = self
            .authorize(self.client.post(url.clone()))
            .multipart(form)
            .send()
            .await?;
        let body = Self::checked_body(response, &url).await?;

        let parsed = if body.trim().is_empty() {
            UploadResponse::default()
        } else {
            serde_json::from_str::<UploadResponse>(&body).map_err(|e| {
                ClientError::Deserialize {
                    context: format!("upload response for {file_name}"),
                    source: e,
                }
            })?
        };

        let keyword_count = parsed.keyword_count.unwrap_or(drafts.len());
        Ok(UploadReceipt {
            success: parsed.success.unwrap_or(true),
            message: parsed.message.unwrap_or_else(|| {
                format!(
                    "Successfully uploaded {file_name}. Processing started for {keyword_count} keywords."
                )
            }),
            keyword_count,
        })
    }

    /// Validates `settings` and persists them via `PUT /api/settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidSettings`] without sending anything if
    /// validation fails, or a transport/status error from the request.
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), ClientError> {
        settings.validate()?;
        let url = self.endpoint(SETTINGS_PATH)?;
        let response = self
            .authorize(self.client.put(url.clone()))
            .json(settings)
            .send()
            .await?;
        Self::checked_body(response, &url).await?;
        tracing::info!(?settings, "settings saved");
        Ok(())
    }

    /// Resolves an API path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.authorize(self.client.get(url.clone())).send().await?;
        let body = Self::checked_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Asserts a 2xx status and returns the body text.
    async fn checked_body(response: Response, url: &Url) -> Result<String, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
