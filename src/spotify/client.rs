use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{SpotifyApi, SpotifyConnect, TimeRange};
use crate::{
    error::ProviderError,
    types::{Artist, CreatePlaylistRequest, CreatePlaylistResponse, Track, UserProfile},
};

/// Provider error messages are cut to this many characters.
const MAX_ERROR_MESSAGE: usize = 200;

/// Builds the HTTP client shared by every Spotify call.
pub fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ProviderError::Http)
}

/// Spotify Web API client authenticated with one bearer token.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: &str, access_token: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
    }

    /// Sends the request and decodes a successful JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = check_status(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Maps non-2xx responses onto [`ProviderError`].
pub(crate) async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            Err(ProviderError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Pulls the human readable part out of a Spotify error body.
///
/// Data endpoints answer `{"error": {"status": .., "message": ..}}`, the
/// accounts service `{"error": "..", "error_description": ".."}`.
fn error_message(body: &str) -> String {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => json["error"]["message"]
            .as_str()
            .or_else(|| json["error_description"].as_str())
            .or_else(|| json["error"].as_str())
            .map(String::from)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    };
    message.chars().take(MAX_ERROR_MESSAGE).collect()
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, ProviderError> {
        SpotifyClient::search_tracks(self, query, limit, offset).await
    }

    async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Track>, ProviderError> {
        SpotifyClient::top_tracks(self, limit, time_range).await
    }

    async fn top_artists(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Artist>, ProviderError> {
        SpotifyClient::top_artists(self, limit, time_range).await
    }

    async fn current_user(&self) -> Result<UserProfile, ProviderError> {
        SpotifyClient::current_user(self).await
    }

    async fn genre_seeds(&self) -> Result<Vec<String>, ProviderError> {
        SpotifyClient::genre_seeds(self).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ProviderError> {
        SpotifyClient::create_playlist(self, user_id, request).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ProviderError> {
        SpotifyClient::add_tracks(self, playlist_id, uris).await
    }
}

/// Hands out [`SpotifyClient`]s that share one connection pool.
#[derive(Clone)]
pub struct HttpConnector {
    http: Client,
    api_url: String,
}

impl HttpConnector {
    pub fn new(http: Client, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
        }
    }
}

impl SpotifyConnect for HttpConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn SpotifyApi> {
        Arc::new(SpotifyClient::new(
            self.http.clone(),
            &self.api_url,
            access_token,
        ))
    }
}
