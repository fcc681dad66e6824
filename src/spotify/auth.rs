use async_trait::async_trait;
use reqwest::Client;

use super::{SpotifyAuth, client::check_status};
use crate::{config::Config, error::ProviderError, types::TokenGrant, utils};

/// Client of the Spotify accounts service.
///
/// Implements the Authorization Code flow with PKCE on top of the client
/// secret: the verifier proves that the party finishing the flow is the one
/// that started it, while the secret authenticates this backend. Token
/// requests use HTTP Basic authentication with `client_id:client_secret`.
pub struct OAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenGrant, ProviderError> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        check_status(res)
            .await?
            .json::<TokenGrant>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SpotifyAuth for OAuthClient {
    /// Builds the URL the browser is sent to for user consent.
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String {
        utils::with_query(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
            ],
        )
    }

    /// Exchanges the authorization code from the callback for a token pair.
    ///
    /// The code is single-use and expires within minutes, so the exchange
    /// happens inside the callback request itself.
    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenGrant, ProviderError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    /// Trades a refresh token for a fresh access token.
    ///
    /// Spotify may or may not rotate the refresh token; a response without
    /// one leaves `TokenGrant::refresh_token` as `None`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ProviderError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// Obtains an app-level token that is not bound to any user.
    async fn client_credentials(&self) -> Result<TokenGrant, ProviderError> {
        self.request_token(&[("grant_type", "client_credentials")])
            .await
    }
}
