#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use moodify::{
    config::Config,
    error::ProviderError,
    management::{MemorySessionStore, SessionStore},
    server::AppState,
    spotify::{SpotifyApi, SpotifyAuth, SpotifyConnect, TimeRange},
    types::{
        Artist, CreatePlaylistRequest, CreatePlaylistResponse, ExternalUrls, TokenGrant, Track,
        UserProfile,
    },
};

pub fn track(name: &str, artist: &str) -> Track {
    Track {
        name: name.to_string(),
        artist: artist.to_string(),
        preview_url: None,
        album_art_url: Some(format!("https://img.example/{}", name)),
        provider_url: Some(format!("https://open.spotify.com/track/{}", name)),
        provider_uri: Some(format!("spotify:track:{}", name)),
    }
}

pub fn tracks(prefix: &str, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("{}-{}", prefix, i), prefix))
        .collect()
}

pub fn artist(name: &str, genres: &[&str]) -> Artist {
    Artist {
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn grant(access: &str, refresh: Option<&str>) -> TokenGrant {
    TokenGrant {
        access_token: access.to_string(),
        refresh_token: refresh.map(String::from),
        scope: Some("user-top-read".to_string()),
        expires_in: 3600,
    }
}

fn failure() -> ProviderError {
    ProviderError::Status {
        status: 500,
        message: "mock failure".to_string(),
    }
}

/// A search call as seen by the fake provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub limit: u32,
    pub offset: u32,
}

/// In-process stand-in for the Spotify data API.
///
/// Searches answer by query string; a query without an entry fails.
#[derive(Default)]
pub struct MockSpotify {
    pub search_results: Mutex<HashMap<String, Vec<Track>>>,
    pub top_artists: Mutex<Option<Vec<Artist>>>,
    pub top_tracks: Mutex<Option<Vec<Track>>>,
    pub seeds: Mutex<Option<Vec<String>>>,
    pub profile: Mutex<Option<UserProfile>>,
    pub searches: Mutex<Vec<SearchCall>>,
    pub created_playlists: Mutex<Vec<(String, CreatePlaylistRequest)>>,
    pub added_tracks: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, tracks: Vec<Track>) -> Self {
        self.search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), tracks);
        self
    }

    pub fn with_top_artists(self, artists: Vec<Artist>) -> Self {
        *self.top_artists.lock().unwrap() = Some(artists);
        self
    }

    pub fn with_top_tracks(self, tracks: Vec<Track>) -> Self {
        *self.top_tracks.lock().unwrap() = Some(tracks);
        self
    }

    pub fn with_seeds(self, seeds: &[&str]) -> Self {
        *self.seeds.lock().unwrap() = Some(seeds.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_profile(self, id: &str, name: &str) -> Self {
        *self.profile.lock().unwrap() = Some(UserProfile {
            id: id.to_string(),
            display_name: Some(name.to_string()),
            email: Some(format!("{}@example.com", id)),
            images: Vec::new(),
        });
        self
    }

    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpotifyApi for MockSpotify {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, ProviderError> {
        self.searches.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            limit,
            offset,
        });

        match self.search_results.lock().unwrap().get(query) {
            Some(tracks) => Ok(tracks.iter().take(limit as usize).cloned().collect()),
            None => Err(failure()),
        }
    }

    async fn top_tracks(
        &self,
        limit: u32,
        _time_range: TimeRange,
    ) -> Result<Vec<Track>, ProviderError> {
        match self.top_tracks.lock().unwrap().as_ref() {
            Some(tracks) => Ok(tracks.iter().take(limit as usize).cloned().collect()),
            None => Err(failure()),
        }
    }

    async fn top_artists(
        &self,
        limit: u32,
        _time_range: TimeRange,
    ) -> Result<Vec<Artist>, ProviderError> {
        match self.top_artists.lock().unwrap().as_ref() {
            Some(artists) => Ok(artists.iter().take(limit as usize).cloned().collect()),
            None => Err(failure()),
        }
    }

    async fn current_user(&self) -> Result<UserProfile, ProviderError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(ProviderError::Unauthorized)
    }

    async fn genre_seeds(&self) -> Result<Vec<String>, ProviderError> {
        self.seeds.lock().unwrap().clone().ok_or_else(failure)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ProviderError> {
        self.created_playlists
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));
        Ok(CreatePlaylistResponse {
            id: "playlist-1".to_string(),
            name: request.name.clone(),
            external_urls: Some(ExternalUrls {
                spotify: Some("https://open.spotify.com/playlist/playlist-1".to_string()),
            }),
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ProviderError> {
        self.added_tracks
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok("snapshot-1".to_string())
    }
}

/// Fake accounts service counting every token request.
pub struct MockAuth {
    pub refresh_grant: Mutex<Option<TokenGrant>>,
    pub exchange_grant: Mutex<Option<TokenGrant>>,
    pub app_grant: Mutex<Option<TokenGrant>>,
    pub refresh_calls: AtomicUsize,
    pub exchange_calls: Mutex<Vec<(String, String)>>,
    pub app_calls: AtomicUsize,
}

impl Default for MockAuth {
    fn default() -> Self {
        Self {
            refresh_grant: Mutex::new(None),
            exchange_grant: Mutex::new(None),
            app_grant: Mutex::new(Some(grant("app-token", None))),
            refresh_calls: AtomicUsize::new(0),
            exchange_calls: Mutex::new(Vec::new()),
            app_calls: AtomicUsize::new(0),
        }
    }
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refresh(self, grant: TokenGrant) -> Self {
        *self.refresh_grant.lock().unwrap() = Some(grant);
        self
    }

    pub fn with_exchange(self, grant: TokenGrant) -> Self {
        *self.exchange_grant.lock().unwrap() = Some(grant);
        self
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn app_token_requests(&self) -> usize {
        self.app_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotifyAuth for MockAuth {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String {
        format!(
            "https://accounts.example/authorize?state={}&code_challenge={}",
            state, code_challenge
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<TokenGrant, ProviderError> {
        self.exchange_calls
            .lock()
            .unwrap()
            .push((code.to_string(), verifier.to_string()));
        self.exchange_grant.lock().unwrap().clone().ok_or_else(failure)
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, ProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_grant.lock().unwrap().clone().ok_or_else(failure)
    }

    async fn client_credentials(&self) -> Result<TokenGrant, ProviderError> {
        self.app_calls.fetch_add(1, Ordering::SeqCst);
        self.app_grant.lock().unwrap().clone().ok_or_else(failure)
    }
}

/// Hands out the same fake API for every token and remembers the tokens.
pub struct MockConnector {
    pub api: Arc<MockSpotify>,
    pub tokens: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(api: Arc<MockSpotify>) -> Self {
        Self {
            api,
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn last_token(&self) -> Option<String> {
        self.tokens.lock().unwrap().last().cloned()
    }
}

impl SpotifyConnect for MockConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn SpotifyApi> {
        self.tokens.lock().unwrap().push(access_token.to_string());
        self.api.clone()
    }
}

pub fn test_config() -> Config {
    Config::new("client-id", "client-secret", "http://127.0.0.1:5000/callback")
}

/// Application state wired to fakes, plus handles to inspect them.
pub struct TestApp {
    pub state: AppState,
    pub api: Arc<MockSpotify>,
    pub auth: Arc<MockAuth>,
    pub connector: Arc<MockConnector>,
    pub sessions: Arc<MemorySessionStore>,
}

pub fn test_app(api: MockSpotify, auth: MockAuth) -> TestApp {
    let api = Arc::new(api);
    let auth = Arc::new(auth);
    let connector = Arc::new(MockConnector::new(api.clone()));
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState::new(
        test_config(),
        auth.clone(),
        connector.clone(),
        sessions.clone() as Arc<dyn SessionStore>,
    )
    .with_rng_seed(7);

    TestApp {
        state,
        api,
        auth,
        connector,
        sessions,
    }
}
