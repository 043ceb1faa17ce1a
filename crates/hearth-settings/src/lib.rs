//! # hearth-settings
//!
//! Layered configuration for the Hearth assistant.
//!
//! Settings resolve in three layers, lowest priority first: compiled
//! defaults, the user's `~/.hearth/settings.json` merged over them, and
//! `HEARTH_*` environment variables on top. The vocabulary used by entity
//! filtering, reranking, and the confirmation state machine lives here
//! rather than as inline literals, so the heuristics stay testable
//! independent of the word lists.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, merge_over, settings_path};
pub use types::*;

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return format!("{home}/{rest}");
        }
    }
    path.to_string()
}
