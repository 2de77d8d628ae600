//! OAuth-specific error types.
//!
//! # Error Types
//!
//! - [`OAuthError::MissingConsumerCredentials`]: consumer key or secret not configured
//! - [`OAuthError::MissingRedirectUri`]: redirect URI not configured
//! - [`OAuthError::MissingAccessToken`]: mediated mode without any token
//! - [`OAuthError::MissingRefreshToken`]: a refresh was requested without a refresh token
//! - [`OAuthError::DirectConnection`]: OAuth used on a direct-mode session
//! - [`OAuthError::StateMismatch`]: callback state does not match the one issued
//! - [`OAuthError::TokenExchangeFailed`]: the authorization-code exchange failed
//! - [`OAuthError::TokenRefreshFailed`]: the refresh-token grant failed
//! - [`OAuthError::Http`]: wrapped HTTP client error
//!
//! # Example
//!
//! ```rust
//! use myob_api::auth::oauth::OAuthError;
//!
//! let error = OAuthError::TokenRefreshFailed {
//!     status: 400,
//!     message: "invalid_grant".to_string(),
//! };
//! assert!(error.to_string().contains("invalid_grant"));
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Errors that can occur while obtaining or refreshing OAuth2 tokens.
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The consumer key or secret is not configured.
    #[error("Consumer key and secret must be configured for OAuth")]
    MissingConsumerCredentials,

    /// The redirect URI is not configured.
    #[error("Redirect URI must be configured for OAuth")]
    MissingRedirectUri,

    /// Mediated mode was used without an access token.
    ///
    /// Configure an access or refresh token, or complete the authorization
    /// code flow with [`Session::exchange_code`](crate::Session::exchange_code).
    #[error("No access token available; configure a token or exchange an authorization code")]
    MissingAccessToken,

    /// A refresh was requested but no refresh token is available.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// OAuth was requested on a session configured for a direct server.
    #[error("OAuth is not used for direct server connections")]
    DirectConnection,

    /// The state returned to the callback does not match the issued state.
    #[error("State parameter mismatch: expected '{expected}', received '{received}'")]
    StateMismatch {
        /// The state value that was issued.
        expected: String,
        /// The state value received in the callback.
        received: String,
    },

    /// Exchanging the authorization code for a token failed.
    ///
    /// A `status` of `0` indicates a network failure before any response.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The error message from the response.
        message: String,
    },

    /// Refreshing the access token failed.
    ///
    /// A `status` of `0` indicates a network failure before any response.
    #[error("Token refresh failed with status {status}: {message}")]
    TokenRefreshFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The error message from the response.
        message: String,
    },

    /// Wrapped HTTP client error.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
