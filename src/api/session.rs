use axum::http::{HeaderMap, header::COOKIE};
use cookie::{Cookie, SameSite, time::Duration};
use uuid::Uuid;

use crate::config::{Config, MAX_SESSION_LIFETIME_DAYS};

pub const SESSION_COOKIE: &str = "moodify_session";

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Session id carried by the request's `Cookie` headers, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| {
            Cookie::split_parse(header)
                .filter_map(Result::ok)
                .find(|c| c.name() == SESSION_COOKIE)
                .map(|c| c.value().to_string())
        })
        .filter(|id| !id.is_empty())
}

/// `Set-Cookie` value binding the browser to `id`.
///
/// The lifetime is clamped to what browsers accept.
pub fn session_cookie(config: &Config, id: &str) -> String {
    let days = config
        .session_lifetime_days
        .clamp(1, MAX_SESSION_LIFETIME_DAYS);

    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::days(days))
        .build()
        .to_string()
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie(config: &Config) -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::seconds(0))
        .build()
        .to_string()
}
