//! Spotify search via the client-credentials flow.
//!
//! The reasoning provider emits queries with optional field prefixes
//! (`track:`, `artist:`, `album:`, `playlist:`); the prefix selects the
//! search type and is stripped from the query so the `q` parameter is not
//! duplicated. Access tokens are cached and refreshed ahead of expiry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::provider::{MusicError, MusicSearch};

/// Refresh the token this many seconds before it actually expires.
const REFRESH_MARGIN_SECS: u64 = 60;

/// Search-type prefixes recognized in generated queries.
const PREFIXES: [&str; 4] = ["track:", "artist:", "album:", "playlist:"];

/// Configuration for the Spotify client.
#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    /// Application client id.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Market passed to the search endpoint.
    pub market: String,
    /// Accounts service base URL (token endpoint).
    pub accounts_url: String,
    /// API base URL (search endpoint).
    pub api_url: String,
}

impl SpotifyConfig {
    /// Production endpoints for the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: "US".to_string(),
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com".to_string(),
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Spotify music search client.
pub struct SpotifyClient {
    config: SpotifyConfig,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl SpotifyClient {
    /// Create a new client.
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Create a new client with a shared HTTP client.
    pub fn with_client(config: SpotifyConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            token: Mutex::new(None),
        }
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock();
        let cached = guard.as_ref()?;
        let margin = Duration::from_secs(REFRESH_MARGIN_SECS);
        (Instant::now() + margin < cached.expires_at).then(|| cached.access_token.clone())
    }

    async fn access_token(&self) -> Result<String, MusicError> {
        if let Some(token) = self.cached_token() {
            debug!("using cached access token");
            return Ok(token);
        }

        let url = format!("{}/api/token", self.config.accounts_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(
                self.config.client_id.trim(),
                Some(self.config.client_secret.trim()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MusicError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "obtained new access token");
        *self.token.lock() = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(token.access_token)
    }

    /// The key the search response nests items under for a search type.
    fn plural_key(search_type: &str) -> String {
        match search_type {
            "track" => "tracks".to_string(),
            "artist" => "artists".to_string(),
            "album" => "albums".to_string(),
            "playlist" => "playlists".to_string(),
            other => format!("{other}s"),
        }
    }
}

/// Split a generated query into `(search_type, query)`.
///
/// A recognized prefix selects the type and is removed from the query;
/// without one the type defaults to `track`.
pub fn parse_music_query(llm_query: &str) -> (&'static str, String) {
    let clean = llm_query.trim();
    let lowered = clean.to_lowercase();
    for prefix in PREFIXES {
        if lowered.starts_with(prefix) {
            let query = clean[prefix.len()..].trim().to_string();
            // PREFIXES entries are 'static; strip the colon for the type.
            let search_type = &prefix[..prefix.len() - 1];
            return (search_type, query);
        }
    }
    ("track", clean.to_string())
}

#[async_trait]
impl MusicSearch for SpotifyClient {
    async fn search(&self, query: &str) -> Result<Option<String>, MusicError> {
        let token = self.access_token().await?;
        let (search_type, q) = parse_music_query(query);
        debug!(search_type, query = %q, "searching");

        let url = format!("{}/v1/search", self.config.api_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", q.as_str()),
                ("type", search_type),
                ("limit", "1"),
                ("market", self.config.market.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MusicError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let uri = body
            .get(Self::plural_key(search_type))
            .and_then(|section| section.get("items"))
            .and_then(|items| items.get(0))
            .and_then(|item| item.get("uri"))
            .and_then(|uri| uri.as_str())
            .map(ToString::to_string);

        if uri.is_none() {
            warn!(search_type, query = %q, "no matching items");
        }
        Ok(uri)
    }
}
