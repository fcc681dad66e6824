use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::session::session_id;
use crate::{
    error::{ApiError, AuthError, UNAUTHORIZED_MESSAGE},
    management::{AuthenticatedClient, TokenSession, short_id},
    server::AppState,
};

/// Extractor guarding every route that acts on behalf of a user.
///
/// Resolves the session cookie to a Spotify client with a valid access
/// token, refreshing it when needed. Requests without a usable token are
/// rejected with 401; a session whose token can no longer be refreshed is
/// removed so the browser has to log in again.
pub struct Authenticated(pub AuthenticatedClient);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id(&parts.headers) else {
            return Err(ApiError::Unauthorized(UNAUTHORIZED_MESSAGE));
        };

        let session = TokenSession::new(
            state.sessions.as_ref(),
            state.auth.as_ref(),
            state.connector.as_ref(),
        );

        match session.ensure_valid_client(&id).await {
            Ok(client) => Ok(Authenticated(client)),
            Err(err @ (AuthError::RefreshFailed(_) | AuthError::MissingRefreshToken)) => {
                tracing::warn!(session = %short_id(&id), error = %err, "dropping session");
                if let Err(e) = state.sessions.remove(&id).await {
                    tracing::error!(error = %e, "could not remove session");
                }
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// `Query` whose rejection is a JSON 400 like every other API error.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// `Json` body whose rejection is a JSON 400.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
