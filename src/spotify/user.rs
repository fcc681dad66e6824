use super::SpotifyClient;
use crate::{
    error::ProviderError,
    types::{GenreSeedsResponse, UserProfile},
};

impl SpotifyClient {
    pub async fn current_user(&self) -> Result<UserProfile, ProviderError> {
        self.fetch(self.get("/me")).await
    }

    /// Lists the genres Spotify accepts as recommendation seeds.
    pub async fn genre_seeds(&self) -> Result<Vec<String>, ProviderError> {
        let res: GenreSeedsResponse = self
            .fetch(self.get("/recommendations/available-genre-seeds"))
            .await?;
        Ok(res.genres)
    }
}
