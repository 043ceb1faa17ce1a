//! # hearth-music
//!
//! Music search for the Hearth assistant.
//!
//! Defines the [`MusicSearch`] trait the orchestrator consumes and a
//! Spotify implementation using the client-credentials flow with a cached
//! access token. A search that finds nothing is `Ok(None)`, not an error —
//! only transport/auth problems surface as [`MusicError`].

#![deny(unsafe_code)]

pub mod provider;
pub mod spotify;

pub use provider::{MusicError, MusicSearch};
pub use spotify::{SpotifyClient, SpotifyConfig, parse_music_query};
