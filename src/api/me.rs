use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::extract::{ApiJson, ApiQuery, Authenticated};
use crate::{
    error::{ApiError, RecommendationError},
    management::{GenreNormalizer, TasteProfile, mood_to_genre},
    server::AppState,
    spotify::{SpotifyApi, TimeRange},
    types::{CreatePlaylistRequest, GenreMatch, RecommendationResult, Track},
};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 30;
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;
const FAVORITE_SONGS_LIMIT: u32 = 20;
const FAVORITE_RECOMMENDATIONS: usize = 20;
const GENRE_ANALYSIS_LIMIT: usize = 15;
const PLAYLIST_TRACKS: usize = 30;
const PLAYLIST_PREVIEW: usize = 10;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
}

/// Recommendations derived from the user's taste profile.
pub async fn recommendations(
    State(state): State<AppState>,
    Authenticated(client): Authenticated,
    ApiQuery(params): ApiQuery<RecommendationParams>,
) -> Json<RecommendationResult> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
        .clamp(1, MAX_RECOMMENDATION_LIMIT);

    let genres = profile_genres(client.api.as_ref()).await;
    Json(recommend_or_empty(&state, client.api.as_ref(), &genres, limit).await)
}

#[derive(Debug, Serialize)]
pub struct FavoriteSongs {
    pub favorite_songs: Vec<Track>,
    pub recommendations: Vec<Track>,
    pub genres_used: Vec<String>,
}

/// The user's top tracks next to fresh recommendations.
pub async fn favorite_songs(
    State(state): State<AppState>,
    Authenticated(client): Authenticated,
) -> Json<FavoriteSongs> {
    let api = client.api.as_ref();

    let favorite_songs = match api
        .top_tracks(FAVORITE_SONGS_LIMIT, TimeRange::MediumTerm)
        .await
    {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch top tracks");
            Vec::new()
        }
    };

    let genres = profile_genres(api).await;
    let result = recommend_or_empty(&state, api, &genres, FAVORITE_RECOMMENDATIONS).await;

    Json(FavoriteSongs {
        favorite_songs,
        recommendations: result.tracks,
        genres_used: result.genres_used,
    })
}

#[derive(Debug, Serialize)]
pub struct GenreAnalysis {
    pub your_top_genres: Vec<String>,
    pub matching_results: Vec<GenreMatch>,
}

/// Shows how the user's raw genres map onto seed genres.
pub async fn genre_analysis(Authenticated(client): Authenticated) -> Json<GenreAnalysis> {
    let api = client.api.as_ref();
    let profile = TasteProfile::derive(api).await;
    let normalizer = GenreNormalizer::from_provider(api).await;

    let top = profile.top(GENRE_ANALYSIS_LIMIT).to_vec();
    let matching_results = top
        .iter()
        .map(|genre| GenreMatch {
            original: genre.clone(),
            matched: normalizer.normalize(genre),
        })
        .collect();

    Json(GenreAnalysis {
        your_top_genres: top,
        matching_results,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistRequest {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub playlist_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistCreated {
    pub message: String,
    pub playlist_id: Option<String>,
    pub playlist_url: Option<String>,
    pub recommendations: Vec<Track>,
    pub genres_used: Vec<String>,
    pub total_available: usize,
}

/// Saves a batch of recommendations as a private playlist on the user's account.
///
/// Genres come from `mood` when given, from the taste profile otherwise.
pub async fn create_playlist(
    State(state): State<AppState>,
    Authenticated(client): Authenticated,
    ApiJson(request): ApiJson<PlaylistRequest>,
) -> Result<Json<PlaylistCreated>, ApiError> {
    let api = client.api.as_ref();
    let mood = request.mood.filter(|m| !m.trim().is_empty());

    let genres = match &mood {
        Some(mood) => vec![mood_to_genre(mood).to_string()],
        None => profile_genres(api).await,
    };

    let result = recommend_or_empty(&state, api, &genres, PLAYLIST_TRACKS).await;
    let uris: Vec<String> = result
        .tracks
        .iter()
        .filter_map(|t| t.provider_uri.clone())
        .collect();

    if uris.is_empty() {
        return Ok(Json(PlaylistCreated {
            message: "No recommendations available.".to_string(),
            playlist_id: None,
            playlist_url: None,
            recommendations: Vec::new(),
            genres_used: result.genres_used,
            total_available: result.total_count,
        }));
    }

    let user = api.current_user().await?;
    let name = request.playlist_name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| {
        match &mood {
            Some(mood) => format!("Moodify: {}", mood),
            None => "Moodify: For You".to_string(),
        }
    });

    let created = api
        .create_playlist(
            &user.id,
            &CreatePlaylistRequest {
                name,
                description: format!("Generated by Moodify from {}", result.genres_used.join(", ")),
                public: false,
            },
        )
        .await?;
    api.add_tracks(&created.id, &uris).await?;

    tracing::info!(playlist = %created.id, tracks = uris.len(), "playlist created");

    Ok(Json(PlaylistCreated {
        message: "Playlist created!".to_string(),
        playlist_url: created.external_urls.and_then(|u| u.spotify),
        playlist_id: Some(created.id),
        recommendations: result.tracks.into_iter().take(PLAYLIST_PREVIEW).collect(),
        genres_used: result.genres_used,
        total_available: result.total_count,
    }))
}

/// Taste-profile genres reconciled with the current seed list.
async fn profile_genres(api: &dyn SpotifyApi) -> Vec<String> {
    let profile = TasteProfile::derive(api).await;
    if profile.is_empty() {
        return Vec::new();
    }

    let normalizer = GenreNormalizer::from_provider(api).await;
    normalizer.match_genres(profile.genres())
}

/// Runs the engine, turning "no genres" into an empty result.
async fn recommend_or_empty(
    state: &AppState,
    api: &dyn SpotifyApi,
    genres: &[String],
    limit: usize,
) -> RecommendationResult {
    let mut rng = state.rng();
    match state.engine.recommend(api, genres, limit, &mut rng).await {
        Ok(result) => result,
        Err(RecommendationError::NoGenresAvailable) => {
            tracing::info!("no genres available, returning empty recommendations");
            RecommendationResult::empty()
        }
    }
}
