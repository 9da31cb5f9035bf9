//! Client and transport settings.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration that talks to production with a 60 second timeout.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::types::BASE_URL;
use crate::user_agent::DEFAULT_MANIFEST_PATHS;

/// Settings handed to a transport when it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Prepend the status line and response headers to the body.
    pub include_headers: bool,
    pub timeout_secs: u64,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            include_headers: false,
            timeout_secs: 60,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

/// Settings shared by every request an executor sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent verbatim instead of the manifest-derived agent.
    pub user_agent: Option<String>,
    pub manifest_paths: Vec<PathBuf>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Production settings pointed at another API root.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `base_url` without trailing slashes.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: None,
            manifest_paths: DEFAULT_MANIFEST_PATHS.iter().map(PathBuf::from).collect(),
            transport: TransportConfig::default(),
        }
    }
}
