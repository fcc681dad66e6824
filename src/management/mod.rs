mod auth;
mod genre;
mod mood;
mod recommendation;
mod session;
mod taste;

pub use auth::AppTokenManager;
pub use auth::AuthenticatedClient;
pub use auth::EXPIRY_BUFFER_SECS;
pub use auth::TokenSession;
pub use auth::is_stale;
pub use auth::short_id;
pub use genre::FALLBACK_SEEDS;
pub use genre::GenreNormalizer;
pub use genre::MAX_MATCHED_GENRES;
pub use genre::alias_for;
pub use mood::DEFAULT_MOOD_GENRE;
pub use mood::mood_to_genre;
pub use mood::playlist_for_mood;
pub use recommendation::MAX_SEARCH_LIMIT;
pub use recommendation::MAX_SEARCH_OFFSET;
pub use recommendation::RecommendationEngine;
pub use recommendation::genre_query;
pub use recommendation::per_genre_target;
pub use session::FileSessionStore;
pub use session::MemorySessionStore;
pub use session::PENDING_LIFETIME_SECS;
pub use session::SessionLifetime;
pub use session::SessionStore;
pub use session::SessionUpdate;
pub use taste::GENRE_SOURCE_ARTISTS;
pub use taste::TOP_ARTIST_LIMIT;
pub use taste::TasteProfile;
pub use taste::derive_top_genres;
