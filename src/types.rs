use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Access/refresh token pair of one logged-in browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: String,
    /// Unix timestamp (seconds) at which `access_token` stops being valid.
    pub expires_at: i64,
}

impl Token {
    pub fn from_grant(grant: TokenGrant, now: i64) -> Self {
        Token {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            scope: grant.scope.unwrap_or_default(),
            expires_at: now + grant.expires_in,
        }
    }

    /// Applies a refresh response, keeping every field the provider left out.
    pub fn merge_grant(&self, grant: TokenGrant, now: i64) -> Self {
        Token {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.or_else(|| self.refresh_token.clone()),
            scope: grant.scope.unwrap_or_else(|| self.scope.clone()),
            expires_at: now + grant.expires_in,
        }
    }
}

/// Body of a successful response from the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// OAuth round trip started by `/login` and not yet completed by `/callback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub state: String,
    pub code_verifier: String,
}

/// Everything stored server-side for one session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<Token>,
    pub pending: Option<PendingAuthorization>,
}

/// Snapshot of a Spotify track as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub preview_url: Option<String>,
    pub album_art_url: Option<String>,
    pub provider_url: Option<String>,
    pub provider_uri: Option<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(t: SpotifyTrack) -> Self {
        Track {
            name: t.name,
            artist: t
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            preview_url: t.preview_url,
            album_art_url: t
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            provider_url: t.external_urls.and_then(|urls| urls.spotify),
            provider_uri: t.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub tracks: Vec<Track>,
    pub genres_used: Vec<String>,
    pub total_count: usize,
}

impl RecommendationResult {
    pub fn empty() -> Self {
        RecommendationResult {
            tracks: Vec::new(),
            genres_used: Vec::new(),
            total_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodPlaylist {
    pub mood: String,
    pub playlist: Vec<Track>,
}

/// Public part of the logged-in user's profile as returned by `/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub authenticated: bool,
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

impl From<UserProfile> for UserStatus {
    fn from(profile: UserProfile) -> Self {
        UserStatus {
            authenticated: true,
            user_id: profile.id,
            display_name: profile.display_name,
            email: profile.email,
            profile_image: profile.images.into_iter().next().map(|i| i.url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreMatch {
    pub original: String,
    pub matched: Option<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artist: String,
    pub url: String,
}

impl From<&Track> for TrackTableRow {
    fn from(t: &Track) -> Self {
        TrackTableRow {
            name: t.name.clone(),
            artist: t.artist.clone(),
            url: t.provider_url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub matched: String,
}

// Spotify Web API payloads

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreSeedsResponse {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
