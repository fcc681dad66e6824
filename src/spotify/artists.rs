use super::{SpotifyClient, TimeRange};
use crate::{
    error::ProviderError,
    types::{Artist, Paging},
};

impl SpotifyClient {
    /// Returns the current user's most played artists in `time_range`,
    /// each with the genre tags Spotify assigns to it.
    pub async fn top_artists(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Artist>, ProviderError> {
        let request = self.get("/me/top/artists").query(&[
            ("limit", limit.to_string()),
            ("time_range", time_range.as_str().to_string()),
        ]);

        let res: Paging<Artist> = self.fetch(request).await?;
        Ok(res.items)
    }
}
