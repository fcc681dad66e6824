use crate::{
    error::ProviderError,
    management::recommendation::genre_query,
    spotify::SpotifyApi,
    types::MoodPlaylist,
};

pub const DEFAULT_MOOD_GENRE: &str = "pop";

const MOOD_GENRES: [(&str, &str); 7] = [
    ("happy", "pop"),
    ("sad", "acoustic"),
    ("chill", "lofi"),
    ("focus", "classical"),
    ("angry", "metal"),
    ("romantic", "r&b"),
    ("energetic", "edm"),
];

/// Genre searched for a mood label; unknown moods map to `pop`.
pub fn mood_to_genre(mood: &str) -> &'static str {
    let mood = mood.trim().to_lowercase();
    MOOD_GENRES
        .iter()
        .find(|(name, _)| *name == mood)
        .map(|(_, genre)| *genre)
        .unwrap_or(DEFAULT_MOOD_GENRE)
}

/// Single search for the mood's genre, without offset or shuffling.
pub async fn playlist_for_mood(
    api: &dyn SpotifyApi,
    mood: &str,
    limit: u32,
) -> Result<MoodPlaylist, ProviderError> {
    let genre = mood_to_genre(mood);
    let playlist = api.search_tracks(&genre_query(genre), limit, 0).await?;

    tracing::debug!(mood, genre, count = playlist.len(), "mood playlist fetched");

    Ok(MoodPlaylist {
        mood: mood.to_string(),
        playlist,
    })
}
