use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::{
    extract::Authenticated,
    session::{expired_session_cookie, new_session_id, session_cookie, session_id},
};
use crate::{
    error::ApiError,
    management::short_id,
    server::AppState,
    types::{PendingAuthorization, SessionData, Token, UserStatus},
    utils,
};

/// Starts the OAuth flow and redirects the browser to Spotify's consent page.
///
/// Every login gets a fresh session id; a session the browser already had is
/// dropped first.
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(old) = session_id(&headers) {
        state.sessions.remove(&old).await?;
    }

    let id = new_session_id();
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);
    let oauth_state = utils::generate_state();

    state
        .sessions
        .save(
            &id,
            SessionData {
                token: None,
                pending: Some(PendingAuthorization {
                    state: oauth_state.clone(),
                    code_verifier: verifier,
                }),
            },
        )
        .await?;

    let url = state.auth.authorize_url(&oauth_state, &challenge);
    tracing::debug!(session = %short_id(&id), "login started");

    Ok((
        [(SET_COOKIE, session_cookie(&state.config, &id))],
        Redirect::to(&url),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Why a callback did not end in a logged-in session; sent to the frontend
/// as `?error=<reason>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFailure {
    AccessDenied,
    NoCode,
    TokenFailed,
    AuthFailed,
}

impl CallbackFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackFailure::AccessDenied => "access_denied",
            CallbackFailure::NoCode => "no_code",
            CallbackFailure::TokenFailed => "token_failed",
            CallbackFailure::AuthFailed => "auth_failed",
        }
    }
}

/// Completes the OAuth flow and redirects to the frontend.
///
/// A failed callback also drops the half-finished login, so the pending
/// session cannot be replayed and does not linger in the store.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let frontend = &state.config.frontend_url;
    let id = session_id(&headers);

    match complete_login(&state, id.as_deref(), params).await {
        Ok(()) => Redirect::to(frontend).into_response(),
        Err(failure) => {
            let url = utils::with_query(frontend, &[("error", failure.as_str())]);
            let redirect = Redirect::to(&url);

            let discarded = match &id {
                Some(id) => discard_pending(&state, id).await,
                None => false,
            };

            if discarded {
                ([(SET_COOKIE, expired_session_cookie(&state.config))], redirect).into_response()
            } else {
                redirect.into_response()
            }
        }
    }
}

/// Removes the session unless it already holds a token.
///
/// Returns whether a session was removed.
async fn discard_pending(state: &AppState, id: &str) -> bool {
    match state.sessions.load(id).await {
        Ok(Some(SessionData { token: Some(_), .. })) => false,
        Ok(None) => false,
        Ok(Some(_)) => match state.sessions.remove(id).await {
            Ok(()) => {
                tracing::debug!(session = %short_id(id), "pending login discarded");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "could not remove session");
                false
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "could not load session");
            false
        }
    }
}

async fn complete_login(
    state: &AppState,
    id: Option<&str>,
    params: CallbackParams,
) -> Result<(), CallbackFailure> {
    if let Some(error) = params.error {
        tracing::info!(%error, "authorization declined at provider");
        return Err(CallbackFailure::AccessDenied);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(CallbackFailure::NoCode);
    };

    let Some(id) = id else {
        tracing::warn!("callback without session cookie");
        return Err(CallbackFailure::AuthFailed);
    };

    let pending = match state.sessions.load(id).await {
        Ok(Some(SessionData {
            pending: Some(pending),
            ..
        })) => pending,
        Ok(_) => {
            tracing::warn!(session = %short_id(id), "callback without pending authorization");
            return Err(CallbackFailure::AuthFailed);
        }
        Err(e) => {
            tracing::error!(error = %e, "could not load session");
            return Err(CallbackFailure::AuthFailed);
        }
    };

    if params.state.as_deref() != Some(pending.state.as_str()) {
        tracing::warn!(session = %short_id(id), "oauth state mismatch");
        return Err(CallbackFailure::AuthFailed);
    }

    let grant = state
        .auth
        .exchange_code(&code, &pending.code_verifier)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "token exchange failed");
            CallbackFailure::TokenFailed
        })?;

    let data = SessionData {
        token: Some(Token::from_grant(grant, utils::now_timestamp())),
        pending: None,
    };

    state.sessions.save(id, data).await.map_err(|e| {
        tracing::error!(error = %e, "could not store session");
        CallbackFailure::AuthFailed
    })?;

    tracing::info!(session = %short_id(id), "login completed");
    Ok(())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(id) = session_id(&headers) {
        state.sessions.remove(&id).await?;
        tracing::info!(session = %short_id(&id), "logged out");
    }

    Ok((
        [(SET_COOKIE, expired_session_cookie(&state.config))],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}

pub async fn status(Authenticated(client): Authenticated) -> Result<Json<UserStatus>, ApiError> {
    let profile = client.api.current_user().await?;
    Ok(Json(UserStatus::from(profile)))
}
