//! Client configuration.
//!
//! A small serde config loaded from a JSON file, with environment-variable
//! overrides so scripted and containerized runs can avoid a config file
//! entirely.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::util::normalize_text_option;

const ENV_REMOTE_URL: &str = "EMBER_REMOTE_URL";
const ENV_DB_PATH: &str = "EMBER_DB_PATH";

/// Client configuration.
///
/// Both fields are optional: without a remote URL the app runs local-only,
/// and without a db path the host picks a platform default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the remote journal store
    #[serde(default)]
    pub remote_base_url: Option<String>,
    /// Path of the local database file
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default (empty) configuration; a present
    /// but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config.normalized())
    }

    /// Apply `EMBER_REMOTE_URL` / `EMBER_DB_PATH` overrides from the process
    /// environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (testable seam).
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = normalize_text_option(lookup(ENV_REMOTE_URL)) {
            self.remote_base_url = Some(url);
        }
        if let Some(path) = normalize_text_option(lookup(ENV_DB_PATH)) {
            self.db_path = Some(PathBuf::from(path));
        }
        self
    }

    fn normalized(mut self) -> Self {
        self.remote_base_url = normalize_text_option(self.remote_base_url);
        self
    }

    /// Serialize to pretty JSON for writing back to disk
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
