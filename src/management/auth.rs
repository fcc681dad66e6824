use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{AuthError, ProviderError},
    management::SessionStore,
    spotify::{SpotifyApi, SpotifyAuth, SpotifyConnect},
    types::{SessionData, Token},
    utils,
};

/// Seconds before `expires_at` at which a token already counts as expired.
///
/// Covers clock skew and the latency of the call the token is about to be
/// used for.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

pub fn is_stale(token: &Token, now: i64) -> bool {
    now >= token.expires_at - EXPIRY_BUFFER_SECS
}

/// Spotify data client bound to the (possibly refreshed) token of a session.
#[derive(Clone)]
pub struct AuthenticatedClient {
    pub session_id: String,
    pub api: Arc<dyn SpotifyApi>,
}

/// Keeps the token pair of one browser session usable.
pub struct TokenSession<'a> {
    store: &'a dyn SessionStore,
    auth: &'a dyn SpotifyAuth,
    connector: &'a dyn SpotifyConnect,
}

impl<'a> TokenSession<'a> {
    pub fn new(
        store: &'a dyn SessionStore,
        auth: &'a dyn SpotifyAuth,
        connector: &'a dyn SpotifyConnect,
    ) -> Self {
        Self {
            store,
            auth,
            connector,
        }
    }

    pub async fn ensure_valid_client(
        &self,
        session_id: &str,
    ) -> Result<AuthenticatedClient, AuthError> {
        self.ensure_valid_client_at(session_id, utils::now_timestamp())
            .await
    }

    /// Returns a client for the session, refreshing the token when stale.
    ///
    /// A refresh happens at most once and is never retried. On
    /// [`AuthError::RefreshFailed`] the caller is expected to drop the session.
    pub async fn ensure_valid_client_at(
        &self,
        session_id: &str,
        now: i64,
    ) -> Result<AuthenticatedClient, AuthError> {
        let token = self
            .store
            .load(session_id)
            .await?
            .and_then(|data| data.token)
            .ok_or(AuthError::NotAuthenticated)?;

        let token = if is_stale(&token, now) {
            self.refresh(session_id, &token, now).await?
        } else {
            token
        };

        Ok(AuthenticatedClient {
            session_id: session_id.to_string(),
            api: self.connector.connect(&token.access_token),
        })
    }

    async fn refresh(&self, session_id: &str, token: &Token, now: i64) -> Result<Token, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingRefreshToken)?;

        tracing::debug!(session = %short_id(session_id), "access token stale, refreshing");

        let grant = self
            .auth
            .refresh(refresh_token)
            .await
            .map_err(AuthError::RefreshFailed)?;

        let refreshed = token.merge_grant(grant, now);
        let stored = refreshed.clone();
        let updated = self
            .store
            .update(
                session_id,
                Box::new(move |data: &mut SessionData| {
                    // keep a refresh token stored meanwhile if this grant had none
                    let refresh_token = stored
                        .refresh_token
                        .clone()
                        .or_else(|| data.token.as_ref().and_then(|t| t.refresh_token.clone()));
                    data.token = Some(Token {
                        refresh_token,
                        ..stored
                    });
                }),
            )
            .await?;

        if updated.is_none() {
            return Err(AuthError::NotAuthenticated);
        }

        tracing::info!(session = %short_id(session_id), "access token refreshed");
        Ok(refreshed)
    }
}

/// Session id prefix that is safe to log.
pub fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}

/// App-level token for requests that are not tied to a user.
///
/// Obtained with the client-credentials grant, cached in-process and
/// re-requested once stale.
pub struct AppTokenManager {
    auth: Arc<dyn SpotifyAuth>,
    token: Mutex<Option<Token>>,
}

impl AppTokenManager {
    pub fn new(auth: Arc<dyn SpotifyAuth>) -> Self {
        Self {
            auth,
            token: Mutex::new(None),
        }
    }

    pub async fn access_token(&self) -> Result<String, ProviderError> {
        self.access_token_at(utils::now_timestamp()).await
    }

    pub async fn access_token_at(&self, now: i64) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if !is_stale(token, now) {
                return Ok(token.access_token.clone());
            }
        }

        let grant = self.auth.client_credentials().await?;
        let token = Token::from_grant(grant, now);
        let access_token = token.access_token.clone();
        *cached = Some(token);

        tracing::debug!("app token obtained");
        Ok(access_token)
    }
}
