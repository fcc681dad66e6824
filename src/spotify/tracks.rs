use super::{SpotifyClient, TimeRange};
use crate::{
    error::ProviderError,
    types::{Paging, SearchResponse, SpotifyTrack, Track},
};

impl SpotifyClient {
    /// Searches the catalog for tracks.
    ///
    /// `query` accepts Spotify's field filters, e.g. `genre:pop`. Spotify caps
    /// `limit` at 50 and `limit + offset` at 1000.
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = client.search_tracks("genre:lofi", 10, 120).await?;
    /// ```
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Track>, ProviderError> {
        let request = self.get("/search").query(&[
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);

        let res: SearchResponse = self.fetch(request).await?;
        Ok(res.tracks.items.into_iter().map(Track::from).collect())
    }

    /// Returns the current user's most played tracks in `time_range`.
    pub async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Track>, ProviderError> {
        let request = self.get("/me/top/tracks").query(&[
            ("limit", limit.to_string()),
            ("time_range", time_range.as_str().to_string()),
        ]);

        let res: Paging<SpotifyTrack> = self.fetch(request).await?;
        Ok(res.items.into_iter().map(Track::from).collect())
    }
}
