//! `User-Agent` derivation from the installed package manifest.
//!
//! The manifest is optional. Every way of failing to read it collapses into
//! `None` and the agent reports an `unknown` version.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::types::SDK_NAME;

/// Manifest locations tried in order when none are configured.
pub const DEFAULT_MANIFEST_PATHS: [&str; 2] =
    ["vendor/myparcelnl/sdk/composer.json", "composer.json"];

#[derive(Debug, Error)]
enum ManifestError {
    #[error("no manifest found")]
    NotFound,
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} has no version")]
    NoVersion { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    version: Option<String>,
}

/// Version recorded in the first existing manifest, without a leading `v`.
pub fn manifest_version<P: AsRef<Path>>(candidates: &[P]) -> Option<String> {
    match read_manifest_version(candidates) {
        Ok(version) => Some(version),
        Err(err) => {
            debug!(error = %err, "falling back to unknown sdk version");
            None
        }
    }
}

fn read_manifest_version<P: AsRef<Path>>(candidates: &[P]) -> Result<String, ManifestError> {
    let path: &Path = candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .find(|path: &&Path| path.is_file())
        .ok_or(ManifestError::NotFound)?;

    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Manifest = serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    manifest
        .version
        .map(|version| version.trim().trim_start_matches('v').to_string())
        .filter(|version| !version.is_empty())
        .ok_or_else(|| ManifestError::NoVersion {
            path: path.to_path_buf(),
        })
}

/// `"MyParcelNL-SDK/<version>"`, with `unknown` standing in for a missing version.
pub fn default_user_agent(version: Option<&str>) -> String {
    format!("{SDK_NAME}/{}", version.unwrap_or("unknown"))
}
