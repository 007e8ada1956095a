use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ember_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No entry matches id prefix '{0}'")]
    UnknownEntry(String),
    #[error("Id prefix '{0}' matches more than one entry")]
    AmbiguousEntry(String),
    #[error("A remote URL is required (pass --remote-url, set EMBER_REMOTE_URL, or add it to the config file)")]
    MissingRemoteUrl,
    #[error("Not signed in; run 'ember login' first")]
    NotSignedIn,
    #[error("Could not determine a platform config/data directory")]
    NoHomeDirectory,
    #[error("Invalid timestamp '{0}'; expected RFC 3339 like 2026-08-06T21:30:00Z")]
    InvalidTimestamp(String),
}
