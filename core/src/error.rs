//! Error types for the MyParcel SDK core.
//!
//! # Design
//! A send either returns a complete outcome or one of these errors. Missing
//! credentials are caught before a transport is opened. `Transport` and `Api`
//! both carry the URL and request body, because the message alone rarely
//! says which shipment was rejected.

use thiserror::Error;

/// Errors returned by `RequestExecutor` and `ClientConfig`.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A required setting (the API key) was not supplied.
    #[error("{0}")]
    Config(String),

    /// A configuration document could not be parsed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// The transport produced no response.
    #[error("Error in MyParcel API request: {message} Url: {url} Request: {body}")]
    Transport {
        message: String,
        url: String,
        body: String,
    },

    /// MyParcel answered with an `errors` payload.
    #[error("Error in MyParcel API request: {message} Url: {url} Request: {body}")]
    Api {
        message: String,
        url: String,
        body: String,
    },
}

impl SdkError {
    pub(crate) fn missing_api_key() -> Self {
        SdkError::Config("api_key not found".to_string())
    }

    /// The bare error message, without URL and request decoration.
    pub fn message(&self) -> String {
        match self {
            SdkError::Config(message) => message.clone(),
            SdkError::InvalidConfig(err) => err.to_string(),
            SdkError::Transport { message, .. } | SdkError::Api { message, .. } => message.clone(),
        }
    }

    /// URL of the failed request, when the failure happened on the wire.
    pub fn url(&self) -> Option<&str> {
        match self {
            SdkError::Transport { url, .. } | SdkError::Api { url, .. } => Some(url),
            _ => None,
        }
    }
}
