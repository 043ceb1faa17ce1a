//! Error type for settings loading.

use thiserror::Error;

/// Why settings could not be loaded.
///
/// Only a present-but-broken file produces an error; a missing file falls
/// back to compiled defaults in the loader.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON for the expected shape.
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
