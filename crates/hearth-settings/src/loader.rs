//! Layered settings loading.
//!
//! Values resolve in three layers: compiled defaults, the user's
//! `~/.hearth/settings.json` merged over them, and `HEARTH_*` environment
//! variables on top. The file may be partial — anything it leaves out keeps
//! its default — but a malformed file is an error, not a silent fallback.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::HearthSettings;

/// Default location of the settings file.
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    Path::new(&home).join(".hearth").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<HearthSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
pub fn load_settings_from_path(path: &Path) -> Result<HearthSettings> {
    let mut layered = serde_json::to_value(HearthSettings::default())?;

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let user: Value = serde_json::from_str(&content)?;
            merge_over(&mut layered, user);
            debug!(?path, "merged settings file over defaults");
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(?path, "no settings file, using defaults");
        }
        Err(error) => return Err(error.into()),
    }

    let mut settings: HearthSettings = serde_json::from_value(layered)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Merge `overlay` into `base` in place.
///
/// Objects merge key by key; any other overlay value — word lists
/// included — replaces the base value outright. Explicit nulls in the
/// overlay are skipped so a file cannot blank out a default.
pub fn merge_over(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(slot) => merge_over(slot, value),
                    None => {
                        let _ = base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply `HEARTH_*` environment overrides on top of the merged settings.
///
/// Numeric overrides are range-checked; anything unparseable or out of
/// range is logged and ignored, keeping the file/default value.
pub fn apply_env_overrides(settings: &mut HearthSettings) {
    if let Some(v) = env_string("HEARTH_INDEX_DIR") {
        settings.index.persist_dir = v;
    }
    if let Some(v) = env_number("HEARTH_QUERY_TOP_K", 1usize, 1000) {
        settings.index.query_top_k = v;
    }
    if let Some(v) = env_number("HEARTH_RERANK_KEEP", 1usize, 1000) {
        settings.index.rerank_keep = v;
    }
    if let Some(v) = env_number("HEARTH_SESSION_TIMEOUT_SECS", 1u64, 86_400) {
        settings.session.timeout_secs = v;
    }
    if let Some(v) = env_string("HEARTH_API_BASE_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = env_string("HEARTH_CHAT_MODEL") {
        settings.api.chat_model = v;
    }
    if let Some(v) = env_string("HEARTH_COMMAND_MODEL") {
        settings.api.command_model = v;
    }
    if let Some(v) = env_string("HEARTH_EMBEDDING_MODEL") {
        settings.api.embedding_model = v;
    }
    if let Some(v) = env_number("HEARTH_REQUEST_TIMEOUT_MS", 100u64, 600_000) {
        settings.api.request_timeout_ms = v;
    }
    if let Some(v) = env_string("HEARTH_HISTORY_PATH") {
        settings.history.path = v;
    }
    if let Some(v) = env_string("HEARTH_PLATFORM_URL") {
        settings.platform.base_url = v;
    }
    if let Some(v) = env_string("SPOTIFY_CLIENT_ID") {
        settings.music.client_id = Some(v);
    }
    if let Some(v) = env_string("SPOTIFY_CLIENT_SECRET") {
        settings.music.client_secret = Some(v);
    }
}

/// Parse `raw` as a number inside `[min, max]`.
pub fn parse_bounded<T>(raw: &str, min: T, max: T) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    let n = raw.parse::<T>().ok()?;
    (min <= n && n <= max).then_some(n)
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_number<T>(name: &str, min: T, max: T) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    let raw = std::env::var(name).ok()?;
    let parsed = parse_bounded(&raw, min, max);
    if parsed.is_none() {
        warn!(key = name, value = %raw, "ignoring unparseable or out-of-range env override");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_merges_nested_objects() {
        let mut base = json!({"index": {"queryTopK": 50, "rerankKeep": 20}});
        merge_over(&mut base, json!({"index": {"queryTopK": 10}}));
        assert_eq!(base, json!({"index": {"queryTopK": 10, "rerankKeep": 20}}));
    }

    #[test]
    fn overlay_replaces_word_lists_wholesale() {
        let mut base = json!({"confirmWords": ["yes", "yep"]});
        merge_over(&mut base, json!({"confirmWords": ["si"]}));
        assert_eq!(base["confirmWords"], json!(["si"]));
    }

    #[test]
    fn null_cannot_blank_a_default() {
        let mut base = json!({"market": "US"});
        merge_over(&mut base, json!({"market": null, "extra": 1}));
        assert_eq!(base, json!({"market": "US", "extra": 1}));
    }

    #[test]
    fn overlay_scalar_replaces_object() {
        let mut base = json!({"session": {"timeoutSecs": 300}});
        merge_over(&mut base, json!({"session": 0}));
        assert_eq!(base["session"], json!(0));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.session.timeout_secs, 300);
        assert_eq!(settings.index.embed_batch_size, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"session": {"timeoutSecs": 60}}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.session.timeout_secs, 60);
        assert_eq!(settings.index.query_top_k, 50);
        assert_eq!(settings.api.request_timeout_ms, 30_000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn parse_bounded_accepts_in_range() {
        assert_eq!(parse_bounded("300", 1u64, 86_400), Some(300));
        assert_eq!(parse_bounded("20", 1usize, 1000), Some(20));
    }

    #[test]
    fn parse_bounded_rejects_out_of_range() {
        assert_eq!(parse_bounded("0", 1u64, 86_400), None);
        assert_eq!(parse_bounded("1001", 1usize, 1000), None);
    }

    #[test]
    fn parse_bounded_rejects_garbage() {
        assert_eq!(parse_bounded::<u64>("five", 1, 10), None);
        assert_eq!(parse_bounded::<usize>("", 1, 10), None);
    }
}
