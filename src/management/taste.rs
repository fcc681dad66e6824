use crate::{
    spotify::{SpotifyApi, TimeRange},
    types::Artist,
    utils,
};

/// Number of top artists requested from the provider.
pub const TOP_ARTIST_LIMIT: u32 = 10;

/// Only the genres of this many leading artists are counted.
pub const GENRE_SOURCE_ARTISTS: usize = 5;

/// Genres a user listens to, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasteProfile {
    genres: Vec<String>,
}

impl TasteProfile {
    /// Derives the profile from the user's medium-term top artists.
    ///
    /// Never fails: an empty artist list or a provider error both yield an
    /// empty profile.
    pub async fn derive(api: &dyn SpotifyApi) -> Self {
        match api.top_artists(TOP_ARTIST_LIMIT, TimeRange::MediumTerm).await {
            Ok(artists) if artists.is_empty() => {
                tracing::info!("no top artists found");
                Self::default()
            }
            Ok(artists) => Self::from_artists(&artists),
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch top artists");
                Self::default()
            }
        }
    }

    pub fn from_artists(artists: &[Artist]) -> Self {
        let tags = artists
            .iter()
            .take(GENRE_SOURCE_ARTISTS)
            .flat_map(|artist| artist.genres.iter().cloned());

        let genres = utils::rank_by_frequency(tags);
        tracing::debug!(genres = ?genres, "taste profile derived");
        Self { genres }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn top(&self, n: usize) -> &[String] {
        &self.genres[..n.min(self.genres.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn into_genres(self) -> Vec<String> {
        self.genres
    }
}

/// Ranked genres of the user behind `api`; empty when none can be derived.
pub async fn derive_top_genres(api: &dyn SpotifyApi) -> Vec<String> {
    TasteProfile::derive(api).await.into_genres()
}
