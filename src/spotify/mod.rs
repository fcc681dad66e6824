//! # Spotify Integration Module
//!
//! This module is the only place that talks HTTP to Spotify. Everything above it
//! depends on three traits instead of concrete clients, so the core logic can be
//! exercised against an in-process fake:
//!
//! ```text
//! Handlers / Management
//!          ↓
//!   SpotifyConnect ──► SpotifyApi   (catalog and user data, bearer token)
//!   SpotifyAuth                     (authorize URL, code exchange, refresh,
//!                                    client credentials)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! ## Error Handling
//!
//! Every call returns `Result<T, ProviderError>`, which lets callers tell an
//! empty-but-successful answer from a failed one. There are no retries: a
//! failing call fails fast and the caller decides whether the failure is local
//! (one genre search) or fatal (a token refresh). The shared `reqwest::Client`
//! is built with an explicit timeout, so no call can hang indefinitely.
//!
//! ## API Coverage
//!
//! - `GET /search` - track search, used with `genre:<value>` queries
//! - `GET /me/top/tracks`, `GET /me/top/artists` - listening history
//! - `GET /me` - profile of the logged-in user
//! - `GET /recommendations/available-genre-seeds` - valid seed genres
//! - `POST /users/{user_id}/playlists`, `POST /playlists/{id}/tracks`
//! - `POST /api/token` - code exchange, refresh and client credentials

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    types::{Artist, CreatePlaylistRequest, CreatePlaylistResponse, TokenGrant, Track, UserProfile},
};

pub mod artists;
pub mod auth;
pub mod client;
pub mod playlist;
pub mod tracks;
pub mod user;

pub use auth::OAuthClient;
pub use client::{HttpConnector, SpotifyClient};

/// Listening window of the `/me/top/*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// Data endpoints reachable with one access token.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, ProviderError>;

    async fn top_tracks(&self, limit: u32, time_range: TimeRange)
    -> Result<Vec<Track>, ProviderError>;

    async fn top_artists(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Artist>, ProviderError>;

    async fn current_user(&self) -> Result<UserProfile, ProviderError>;

    async fn genre_seeds(&self) -> Result<Vec<String>, ProviderError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ProviderError>;

    /// Returns the playlist snapshot id after the insert.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String])
    -> Result<String, ProviderError>;
}

/// OAuth endpoints of the Spotify accounts service.
#[async_trait]
pub trait SpotifyAuth: Send + Sync {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String;

    async fn exchange_code(&self, code: &str, verifier: &str)
    -> Result<TokenGrant, ProviderError>;

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ProviderError>;

    async fn client_credentials(&self) -> Result<TokenGrant, ProviderError>;
}

/// Builds a data client bound to an access token.
pub trait SpotifyConnect: Send + Sync {
    fn connect(&self, access_token: &str) -> Arc<dyn SpotifyApi>;
}
