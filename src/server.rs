use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use rand::{SeedableRng, rngs::StdRng};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    Res, api,
    config::{Config, SessionBackend},
    management::{
        AppTokenManager, FileSessionStore, MemorySessionStore, RecommendationEngine, SessionLifetime,
        SessionStore,
    },
    spotify::{HttpConnector, OAuthClient, SpotifyAuth, SpotifyConnect, client::build_http_client},
};

/// Collaborators shared by every request.
///
/// All of them are constructed explicitly and passed in, so tests can swap
/// the Spotify side for fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn SpotifyAuth>,
    pub connector: Arc<dyn SpotifyConnect>,
    pub sessions: Arc<dyn SessionStore>,
    pub app_token: Arc<AppTokenManager>,
    pub engine: Arc<RecommendationEngine>,
    rng_seed: Option<u64>,
}

impl AppState {
    pub fn new(
        config: Config,
        auth: Arc<dyn SpotifyAuth>,
        connector: Arc<dyn SpotifyConnect>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let engine = RecommendationEngine::new(config.search_concurrency);
        Self {
            config: Arc::new(config),
            app_token: Arc::new(AppTokenManager::new(Arc::clone(&auth))),
            auth,
            connector,
            sessions,
            engine: Arc::new(engine),
            rng_seed: None,
        }
    }

    /// Wires the reqwest-backed Spotify clients and the configured session store.
    pub async fn from_config(config: Config) -> Res<Self> {
        let http = build_http_client(config.request_timeout)?;
        let auth = Arc::new(OAuthClient::new(http.clone(), &config));
        let connector = Arc::new(HttpConnector::new(http, &config.api_url));

        let lifetime = SessionLifetime::days(config.session_lifetime_days);
        let sessions: Arc<dyn SessionStore> = match &config.session_backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new().with_lifetime(lifetime)),
            SessionBackend::File(path) => Arc::new(
                FileSessionStore::open(path.clone())
                    .await?
                    .with_lifetime(lifetime),
            ),
        };

        Ok(Self::new(config, auth, connector, sessions))
    }

    /// Makes every request draw its randomness from `seed`.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Random source for one request.
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", post(api::logout))
        .route("/status", get(api::status));

    let me_routes = Router::new()
        .route("/recommendations", get(api::recommendations))
        .route("/favorite-songs", get(api::favorite_songs))
        .route("/genre-analysis", get(api::genre_analysis))
        .route("/playlist", post(api::create_playlist));

    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/mood", get(api::mood))
        .route("/recommendations", get(api::recommendations))
        .merge(auth_routes.clone())
        .nest("/api", auth_routes)
        .nest("/me", me_routes)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.config.server_address)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
