use std::sync::Arc;

use tabled::Table;

use super::mood::spinner;
use crate::{
    config::Config,
    error, info,
    management::{AppTokenManager, GenreNormalizer},
    spotify::{HttpConnector, OAuthClient, SpotifyConnect, client::build_http_client},
    types::GenreTableRow,
};

/// Prints the seed genre each raw genre normalizes to.
pub async fn genres(config: Config, raw: Vec<String>) {
    let http = match build_http_client(config.request_timeout) {
        Ok(http) => http,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };
    let app_token = AppTokenManager::new(Arc::new(OAuthClient::new(http.clone(), &config)));
    let connector = HttpConnector::new(http, &config.api_url);

    let pb = spinner("Fetching genre seeds...".to_string());
    let normalizer = match app_token.access_token().await {
        Ok(token) => GenreNormalizer::from_provider(connector.connect(&token).as_ref()).await,
        Err(_) => GenreNormalizer::fallback(),
    };
    pb.finish_and_clear();

    info!("Matching against {} seed genres", normalizer.seeds().len());

    let rows: Vec<GenreTableRow> = raw
        .iter()
        .map(|genre| GenreTableRow {
            genre: genre.clone(),
            matched: normalizer
                .normalize(genre)
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
