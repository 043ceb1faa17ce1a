//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! settings file deep-merges cleanly over compiled defaults. Each type
//! implements [`Default`] with production values.

use serde::{Deserialize, Serialize};

/// Root settings type for the Hearth assistant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HearthSettings {
    /// Settings schema version.
    pub version: String,
    /// Installation name.
    pub name: String,
    /// Retrieval index settings.
    pub index: IndexSettings,
    /// Session / confirmation settings.
    pub session: SessionSettings,
    /// Filter and rerank vocabulary.
    pub vocabulary: VocabularySettings,
    /// Reasoning / embedding API settings.
    pub api: ApiSettings,
    /// Host platform settings.
    pub platform: PlatformSettings,
    /// Music search settings.
    pub music: MusicSettings,
    /// Command history settings.
    pub history: HistorySettings,
}

impl Default for HearthSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "hearth".to_string(),
            index: IndexSettings::default(),
            session: SessionSettings::default(),
            vocabulary: VocabularySettings::default(),
            api: ApiSettings::default(),
            platform: PlatformSettings::default(),
            music: MusicSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

/// Retrieval index settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexSettings {
    /// Directory holding the persisted matrix / document pair (may contain `~`).
    pub persist_dir: String,
    /// Documents embedded per provider call during rebuild.
    pub embed_batch_size: usize,
    /// Candidates fetched from the similarity index per query.
    pub query_top_k: usize,
    /// Candidates kept after reranking.
    pub rerank_keep: usize,
    /// Maximum characters of each candidate folded into the synthesis context.
    pub snippet_max_chars: usize,
    /// Attempt one automatic rebuild when the index is missing at query time.
    pub auto_rebuild: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            persist_dir: "~/.hearth/index".to_string(),
            embed_batch_size: 50,
            query_top_k: 50,
            rerank_keep: 20,
            snippet_max_chars: 1000,
            auto_rebuild: true,
        }
    }
}

/// Session / confirmation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Seconds before a pending confirmation is evicted by the sweep.
    pub timeout_secs: u64,
    /// Responses treated as confirmation (matched case-insensitively).
    pub confirm_words: Vec<String>,
    /// Responses treated as cancellation.
    pub cancel_words: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            confirm_words: strings(&["yes", "yep", "yeah", "sure", "go ahead"]),
            cancel_words: strings(&["no", "nope", "nah"]),
        }
    }
}

/// Word lists driving entity filtering and reranking.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VocabularySettings {
    /// Domains excluded from the retrieval index entirely.
    pub excluded_domains: Vec<String>,
    /// Domains boosted during rerank, most-preferred first.
    pub preferred_domains: Vec<String>,
    /// Room names scanned for in the query text (first match wins).
    pub location_keywords: Vec<String>,
    /// Domains penalized during rerank.
    pub penalized_domains: Vec<String>,
}

impl Default for VocabularySettings {
    fn default() -> Self {
        Self {
            excluded_domains: strings(&[
                "number",
                "switch",
                "binary_sensor",
                "automation",
                "assist_satellite",
                "button",
                "camera",
                "conversation",
                "event",
                "input_select",
                "script",
                "select",
                "sensor",
                "stt",
                "sun",
                "tts",
                "time",
                "update",
                "wake_word",
                "zone",
            ]),
            preferred_domains: strings(&[
                "light",
                "climate",
                "fan",
                "media_player",
                "switch",
                "cover",
            ]),
            location_keywords: strings(&[
                "office",
                "living room",
                "bedroom",
                "nursery",
                "kitchen",
            ]),
            penalized_domains: strings(&["sensor", "binary_sensor", "automation"]),
        }
    }
}

/// Reasoning / embedding API settings.
///
/// The API key itself is never written to the settings file; it is read from
/// the `OPENAI_API_KEY` environment variable at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model used for classification and the small helper prompts.
    pub chat_model: String,
    /// Model used for command generation.
    pub command_model: String,
    /// Model used for embeddings.
    pub embedding_model: String,
    /// Bounded timeout applied to every external call, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            command_model: "o3-mini".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Host platform REST settings.
///
/// The access token is read from the `HEARTH_PLATFORM_TOKEN` environment
/// variable and never written to the settings file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSettings {
    /// Base URL of the platform's REST API.
    pub base_url: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            base_url: "http://homeassistant.local:8123".to_string(),
        }
    }
}

/// Music search settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicSettings {
    /// Spotify application client id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Spotify application client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Market passed to the search endpoint.
    pub market: String,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            market: "US".to_string(),
        }
    }
}

/// Command history settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    /// Path of the history file (may contain `~`).
    pub path: String,
    /// Most-recent entries kept; older ones are evicted.
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: "~/.hearth/command_history.json".to_string(),
            max_entries: 1000,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
