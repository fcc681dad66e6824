use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error,
    management::{AppTokenManager, MAX_SEARCH_LIMIT, mood_to_genre, playlist_for_mood},
    spotify::{HttpConnector, OAuthClient, SpotifyConnect, client::build_http_client},
    success,
    types::TrackTableRow,
    warning,
};

pub async fn mood(config: Config, feeling: String, limit: u32) {
    let http = match build_http_client(config.request_timeout) {
        Ok(http) => http,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };
    let app_token = AppTokenManager::new(Arc::new(OAuthClient::new(http.clone(), &config)));
    let connector = HttpConnector::new(http, &config.api_url);

    let pb = spinner(format!(
        "Searching {} tracks for '{}'...",
        mood_to_genre(&feeling),
        feeling
    ));

    let token = match app_token.access_token().await {
        Ok(token) => token,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to obtain app token. Err: {}", e);
        }
    };

    let api = connector.connect(&token);
    let result = playlist_for_mood(api.as_ref(), &feeling, limit.clamp(1, MAX_SEARCH_LIMIT)).await;
    pb.finish_and_clear();

    match result {
        Ok(playlist) if playlist.playlist.is_empty() => {
            warning!("No tracks found for mood '{}'", playlist.mood)
        }
        Ok(playlist) => {
            let rows: Vec<TrackTableRow> = playlist.playlist.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
            success!("{} tracks for mood '{}'", playlist.playlist.len(), playlist.mood);
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}

pub(crate) fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
