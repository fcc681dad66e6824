//! Genre-based recommendations built on the track search endpoint.
//!
//! Each genre gets one `genre:<name>` search at a random offset, so repeated
//! calls for the same genre do not keep returning the top of the catalog.
//! The pooled candidates are shuffled before trimming so that no genre is
//! favored by its position in the input list.

use futures::{StreamExt, stream};
use rand::{Rng, seq::SliceRandom};

use crate::{
    error::RecommendationError,
    spotify::SpotifyApi,
    types::{RecommendationResult, Track},
};

/// Highest random search offset. Spotify rejects `offset + limit > 1000`.
pub const MAX_SEARCH_OFFSET: u32 = 950;

/// Spotify's maximum page size for search.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Search query restricting results to one genre.
pub fn genre_query(genre: &str) -> String {
    if genre.contains(char::is_whitespace) {
        format!("genre:\"{}\"", genre)
    } else {
        format!("genre:{}", genre)
    }
}

/// Tracks requested per genre so the pool likely reaches `limit` even when
/// some searches come back short or fail.
pub fn per_genre_target(limit: usize, genre_count: usize) -> u32 {
    let target = limit / genre_count.max(1) + 1;
    (target as u32).min(MAX_SEARCH_LIMIT)
}

pub struct RecommendationEngine {
    concurrency: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(4)
    }
}

impl RecommendationEngine {
    /// `concurrency` bounds how many genre searches are in flight at once.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Collects up to `limit` tracks across `genres`.
    ///
    /// A failing genre search is logged and skipped; the request as a whole
    /// only fails when `genres` is empty. All randomness (offsets and the
    /// final shuffle) is drawn from `rng`, and results are aggregated in
    /// genre order, so a seeded `rng` gives reproducible output.
    pub async fn recommend<R>(
        &self,
        api: &dyn SpotifyApi,
        genres: &[String],
        limit: usize,
        rng: &mut R,
    ) -> Result<RecommendationResult, RecommendationError>
    where
        R: Rng,
    {
        if genres.is_empty() {
            return Err(RecommendationError::NoGenresAvailable);
        }

        let target = per_genre_target(limit, genres.len());
        let plan: Vec<(&String, u32)> = genres
            .iter()
            .map(|genre| (genre, rng.random_range(0..=MAX_SEARCH_OFFSET)))
            .collect();

        tracing::debug!(?genres, limit, target, "searching tracks per genre");

        // futures are built up front so each one owns its query string
        let searches: Vec<_> = plan
            .into_iter()
            .map(|(genre, offset)| {
                let query = genre_query(genre);
                async move {
                    let result = api.search_tracks(&query, target, offset).await;
                    (genre, result)
                }
            })
            .collect();

        let results: Vec<_> = stream::iter(searches)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut pool: Vec<Track> = Vec::new();
        for (genre, result) in results {
            match result {
                Ok(tracks) => pool.extend(tracks),
                Err(e) => tracing::warn!(genre = %genre, error = %e, "genre search failed, skipping"),
            }
        }

        pool.shuffle(rng);
        pool.truncate(limit);

        tracing::info!(count = pool.len(), "recommendations assembled");

        Ok(RecommendationResult {
            total_count: pool.len(),
            tracks: pool,
            genres_used: genres.to_vec(),
        })
    }
}
