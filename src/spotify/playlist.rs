use super::SpotifyClient;
use crate::{
    error::ProviderError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

/// Spotify accepts at most this many URIs per insert.
const MAX_TRACKS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    pub async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ProviderError> {
        let path = format!("/users/{}/playlists", user_id);
        self.fetch(self.post(&path).json(request)).await
    }

    /// Appends `uris` to the playlist in batches and returns the last snapshot id.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ProviderError> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let mut snapshot_id = String::new();

        for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let res: AddTrackToPlaylistResponse = self.fetch(self.post(&path).json(&body)).await?;
            snapshot_id = res.snapshot_id;
        }

        Ok(snapshot_id)
    }
}
