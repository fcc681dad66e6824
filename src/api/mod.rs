//! # API Module
//!
//! HTTP handlers of the Moodify backend, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Redirects to Spotify's consent page (`GET /login`)
//! - [`callback`] - Exchanges the authorization code and redirects to the
//!   frontend, with `?error=<reason>` on failure (`GET /callback`)
//! - [`logout`] - Drops the session (`POST /logout`)
//! - [`status`] - Profile of the logged-in user (`GET /status`)
//!
//! The four routes are served both at the root and under `/api`.
//!
//! ### Recommendations
//!
//! - [`recommendations`] - Personalized tracks (`GET /recommendations`, `GET /me/recommendations`)
//! - [`favorite_songs`] - Top tracks plus recommendations (`GET /me/favorite-songs`)
//! - [`genre_analysis`] - Raw to seed genre mapping (`GET /me/genre-analysis`)
//! - [`create_playlist`] - Saves recommendations as a playlist (`POST /me/playlist`)
//! - [`mood`] - Anonymous playlist for a mood (`GET /mood?feeling=<mood>&limit=<n>`)
//!
//! ### Monitoring
//!
//! - [`home`] - Welcome message (`GET /`)
//! - [`health`] - Status and version (`GET /health`)
//!
//! ## Sessions
//!
//! A `moodify_session` cookie (HttpOnly, SameSite=Lax) identifies the
//! server-side session holding the token pair. Routes acting for a user take
//! the [`Authenticated`] extractor, which answers 401 when no valid token can
//! be obtained.
//!
//! Malformed query strings and bodies are answered with a JSON 400 through
//! [`ApiQuery`] and [`ApiJson`].

mod auth;
mod extract;
mod health;
mod me;
mod mood;
pub mod session;

pub use auth::CallbackFailure;
pub use auth::callback;
pub use auth::login;
pub use auth::logout;
pub use auth::status;
pub use extract::ApiJson;
pub use extract::ApiQuery;
pub use extract::Authenticated;
pub use health::health;
pub use health::home;
pub use me::create_playlist;
pub use me::favorite_songs;
pub use me::genre_analysis;
pub use me::recommendations;
pub use mood::mood;
