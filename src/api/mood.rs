use axum::{Json, extract::State};
use serde::Deserialize;

use super::extract::ApiQuery;
use crate::{
    error::ApiError,
    management::{MAX_SEARCH_LIMIT, playlist_for_mood},
    server::AppState,
    types::MoodPlaylist,
};

pub const DEFAULT_MOOD: &str = "happy";
pub const DEFAULT_MOOD_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct MoodParams {
    pub feeling: Option<String>,
    pub limit: Option<u32>,
}

/// Anonymous playlist for a mood, served with the app-level token.
pub async fn mood(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MoodParams>,
) -> Result<Json<MoodPlaylist>, ApiError> {
    let feeling = params
        .feeling
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MOOD.to_string());
    let limit = params
        .limit
        .unwrap_or(DEFAULT_MOOD_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let token = state.app_token.access_token().await?;
    let api = state.connector.connect(&token);

    let playlist = playlist_for_mood(api.as_ref(), &feeling, limit).await?;
    Ok(Json(playlist))
}
