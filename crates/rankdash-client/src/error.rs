use rankdash_core::{ConfigError, CoreError, CsvError};
use thiserror::Error;

/// Errors returned by the remote ranking API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The upload file failed local validation and was not sent.
    #[error("invalid upload file: {0}")]
    InvalidUpload(#[from] CsvError),

    #[error(transparent)]
    InvalidKeyword(#[from] CoreError),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] ConfigError),
}
