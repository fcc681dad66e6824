//! Configuration management for the Moodify backend.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are read once into a [`Config`] that is then
//! handed to every component that needs it, instead of being looked up ad hoc.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "playlist-modify-public playlist-modify-private user-read-private user-top-read user-read-email";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Browsers cap cookie lifetimes at 400 days.
pub const MAX_SESSION_LIFETIME_DAYS: i64 = 400;

/// Where browser sessions are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    File(PathBuf),
}

/// Runtime configuration of the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Applied to every single call against Spotify.
    pub request_timeout: Duration,
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub session_backend: SessionBackend,
    pub cookie_secure: bool,
    pub session_lifetime_days: i64,
    /// Upper bound of genre searches running at the same time.
    pub search_concurrency: usize,
}

impl Config {
    /// Builds a configuration with defaults for everything but the OAuth client.
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
            session_backend: SessionBackend::Memory,
            cookie_secure: false,
            session_lifetime_days: 31,
            search_concurrency: 4,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when one of the OAuth client variables
    /// (`SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET`,
    /// `SPOTIFY_API_REDIRECT_URI`) is unset, and [`ConfigError::Invalid`] when a
    /// numeric or boolean variable cannot be parsed or `SESSION_LIFETIME_DAYS`
    /// lies outside `1..=400`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(
            &required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            &required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            &required("SPOTIFY_API_REDIRECT_URI")?,
        );

        if let Some(addr) = optional("SERVER_ADDRESS") {
            config.server_address = addr;
        }
        if let Some(scope) = optional("SPOTIFY_API_AUTH_SCOPE") {
            config.scope = scope;
        }
        if let Some(url) = optional("SPOTIFY_API_AUTH_URL") {
            config.auth_url = url;
        }
        if let Some(url) = optional("SPOTIFY_API_TOKEN_URL") {
            config.token_url = url;
        }
        if let Some(url) = optional("SPOTIFY_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parsed::<u64>("SPOTIFY_REQUEST_TIMEOUT")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(url) = optional("FRONTEND_URL") {
            config.frontend_url = url;
        }
        if let Some(origins) = optional("CORS_ORIGINS") {
            config.cors_origins = split_list(&origins);
        }

        config.session_backend = match optional("SESSION_STORE").as_deref() {
            None | Some("memory") => SessionBackend::Memory,
            Some("file") => SessionBackend::File(
                optional("SESSION_STORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_session_path),
            ),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SESSION_STORE",
                    value: other.to_string(),
                });
            }
        };

        if let Some(secure) = parsed::<bool>("SESSION_COOKIE_SECURE")? {
            config.cookie_secure = secure;
        }
        if let Some(days) = parsed::<i64>("SESSION_LIFETIME_DAYS")? {
            if !(1..=MAX_SESSION_LIFETIME_DAYS).contains(&days) {
                return Err(ConfigError::Invalid {
                    name: "SESSION_LIFETIME_DAYS",
                    value: days.to_string(),
                });
            }
            config.session_lifetime_days = days;
        }
        if let Some(n) = parsed::<usize>("SEARCH_CONCURRENCY")? {
            config.search_concurrency = n.max(1);
        }

        Ok(config)
    }
}

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then `moodify/.env` inside the
/// platform-specific local data directory:
/// - Linux: `~/.local/share/moodify/.env`
/// - macOS: `~/Library/Application Support/moodify/.env`
/// - Windows: `%LOCALAPPDATA%/moodify/.env`
///
/// Both files are optional. Variables already present in the environment are
/// never overwritten.
///
/// # Errors
///
/// Returns an error string when an existing `.env` file cannot be parsed.
pub fn load_env() -> Result<(), String> {
    let local = PathBuf::from(".env");
    load_env_file(&local)?;
    load_env_file(&data_dir().join(".env"))
}

fn load_env_file(path: &Path) -> Result<(), String> {
    if !path.is_file() {
        return Ok(());
    }
    dotenv::from_path(path)
        .map(|_| ())
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Directory holding the `.env` file and the persisted sessions.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodify");
    path
}

fn default_session_path() -> PathBuf {
    data_dir().join("sessions.json")
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
