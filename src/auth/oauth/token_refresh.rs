//! Access token refresh.
//!
//! MYOB access tokens are short-lived (20 minutes). A refresh token issued
//! with them can be exchanged for a new access token without user
//! interaction.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::auth::oauth::refresh_access_token;
//!
//! if token.expired() {
//!     if let Some(refresh_token) = token.refresh_token() {
//!         token = refresh_access_token(&config, refresh_token).await?;
//!     }
//! }
//! ```

use crate::auth::oauth::token_exchange::{consumer_credentials, post_token_request};
use crate::auth::oauth::OAuthError;
use crate::auth::AccessToken;
use crate::clients::HttpClient;
use crate::config::MyobConfig;

const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - [`OAuthError::MissingConsumerCredentials`] without a consumer key and secret
/// - [`OAuthError::TokenRefreshFailed`] if the refresh request fails
pub async fn refresh_access_token(
    config: &MyobConfig,
    refresh_token: &str,
) -> Result<AccessToken, OAuthError> {
    let (client_id, client_secret) = consumer_credentials(config)?;

    let form = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("refresh_token", refresh_token),
        ("grant_type", REFRESH_TOKEN_GRANT_TYPE),
    ];

    let response = post_token_request(config, &form, |status, message| {
        OAuthError::TokenRefreshFailed { status, message }
    })
    .await?;

    tracing::debug!(expires_in = ?response.expires_in, "Refreshed access token");

    let http = HttpClient::new(Some(config))?;
    Ok(AccessToken::from_response(http, response))
}
