//! Authorization code exchange.
//!
//! After the user approves access, MYOB redirects to the configured redirect
//! URI with a `code` query parameter. [`exchange_code`] trades that code for
//! an [`AccessToken`]; [`validate_auth_callback`] additionally checks the
//! returned state first.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::auth::oauth::{begin_auth, validate_auth_callback, AuthQuery};
//!
//! let result = begin_auth(&config)?;
//! // ... redirect to result.auth_url, receive the callback ...
//! let query = AuthQuery::new(code, state);
//! let token = validate_auth_callback(&config, &query, &result.state).await?;
//! ```

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::state::StateParam;
use crate::auth::{AccessToken, AccessTokenResponse};
use crate::clients::HttpClient;
use crate::config::MyobConfig;

const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Path of the token endpoint, relative to the OAuth base URL.
pub(crate) const TOKEN_PATH: &str = "oauth2/v1/authorize";

/// Query parameters MYOB sends to the redirect URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthQuery {
    /// The authorization code.
    pub code: String,
    /// The state issued by [`begin_auth`](super::begin_auth).
    pub state: String,
}

impl AuthQuery {
    /// Creates a callback query from its parameters.
    #[must_use]
    pub fn new(code: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: state.into(),
        }
    }
}

/// Validates the callback state and exchanges its code for a token.
///
/// # Errors
///
/// - [`OAuthError::StateMismatch`] if the state differs from `expected_state`
/// - any error from [`exchange_code`]
pub async fn validate_auth_callback(
    config: &MyobConfig,
    auth_query: &AuthQuery,
    expected_state: &StateParam,
) -> Result<AccessToken, OAuthError> {
    if !expected_state.matches(&auth_query.state) {
        return Err(OAuthError::StateMismatch {
            expected: expected_state.to_string(),
            received: auth_query.state.clone(),
        });
    }

    exchange_code(config, &auth_query.code).await
}

/// Exchanges an authorization code for an access token.
///
/// The token is bound to an [`HttpClient`] for the configured API base URL.
///
/// # Errors
///
/// - [`OAuthError::MissingConsumerCredentials`] without a consumer key and secret
/// - [`OAuthError::MissingRedirectUri`] without a redirect URI
/// - [`OAuthError::TokenExchangeFailed`] if the token endpoint rejects the code
pub async fn exchange_code(config: &MyobConfig, code: &str) -> Result<AccessToken, OAuthError> {
    let (client_id, client_secret) = consumer_credentials(config)?;
    let redirect_uri = config.redirect_uri().ok_or(OAuthError::MissingRedirectUri)?;

    let form = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("scope", super::authorize::COMPANY_FILE_SCOPE),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("grant_type", AUTHORIZATION_CODE_GRANT_TYPE),
    ];

    let response = post_token_request(config, &form, |status, message| {
        OAuthError::TokenExchangeFailed { status, message }
    })
    .await?;

    tracing::debug!("Exchanged authorization code for access token");

    let http = HttpClient::new(Some(config))?;
    Ok(AccessToken::from_response(http, response))
}

/// Returns the consumer key and secret, both required by the token endpoint.
pub(crate) fn consumer_credentials(config: &MyobConfig) -> Result<(&str, &str), OAuthError> {
    match (config.consumer_key(), config.consumer_secret()) {
        (Some(key), Some(secret)) => Ok((key.as_ref(), secret.as_ref())),
        _ => Err(OAuthError::MissingConsumerCredentials),
    }
}

/// POSTs a form-encoded grant to the token endpoint.
///
/// `failure` builds the error for both network failures (status `0`) and
/// non-success responses.
pub(crate) async fn post_token_request(
    config: &MyobConfig,
    form: &[(&str, &str)],
    failure: fn(u16, String) -> OAuthError,
) -> Result<AccessTokenResponse, OAuthError> {
    let token_url = format!("{}{TOKEN_PATH}", config.oauth_base_url());

    // The token endpoint is unauthenticated, so reqwest is used directly
    let client = reqwest::Client::new();
    let response = client
        .post(&token_url)
        .form(form)
        .send()
        .await
        .map_err(|e| failure(0, format!("Network error: {e}")))?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(failure(status, error_body));
    }

    response
        .json::<AccessTokenResponse>()
        .await
        .map_err(|e| failure(status, format!("Failed to parse token response: {e}")))
}
