//! Authorization URL generation.
//!
//! [`begin_auth`] is the first step of the authorization code flow: it
//! builds the URL the user is sent to in order to grant access to their
//! company files, together with the [`StateParam`] to check on the callback.

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::state::StateParam;
use crate::config::MyobConfig;

/// The only scope AccountRight grants.
pub(crate) const COMPANY_FILE_SCOPE: &str = "CompanyFile";

/// Path of the authorize endpoint, relative to the OAuth base URL.
const AUTHORIZE_PATH: &str = "oauth2/account/authorize";

/// Result of initiating OAuth authorization.
///
/// The `state` must be kept by the application and passed to
/// [`validate_auth_callback`](crate::auth::oauth::validate_auth_callback)
/// when the callback arrives.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The full authorization URL to redirect the user to.
    pub auth_url: String,
    /// The state parameter embedded in `auth_url`.
    pub state: StateParam,
}

/// Builds the authorization URL with a freshly generated state.
///
/// # Errors
///
/// - [`OAuthError::MissingConsumerCredentials`] without a consumer key
/// - [`OAuthError::MissingRedirectUri`] without a redirect URI
///
/// # Example
///
/// ```rust
/// use myob_api::{MyobConfig, ConsumerKey};
/// use myob_api::auth::oauth::begin_auth;
///
/// let config = MyobConfig::builder()
///     .consumer_key(ConsumerKey::new("my-key").unwrap())
///     .redirect_uri("http://localhost:5000/callback")
///     .build()
///     .unwrap();
///
/// let result = begin_auth(&config).unwrap();
/// assert!(result.auth_url.starts_with("https://secure.myob.com/oauth2/account/authorize?"));
/// assert!(result.auth_url.contains("scope=CompanyFile"));
/// ```
pub fn begin_auth(config: &MyobConfig) -> Result<BeginAuthResult, OAuthError> {
    let state = StateParam::new();
    let auth_url = authorization_url(config, &state)?;
    Ok(BeginAuthResult { auth_url, state })
}

/// Builds the authorization URL for a caller-supplied state.
///
/// # Errors
///
/// Same as [`begin_auth`].
pub fn authorization_url(config: &MyobConfig, state: &StateParam) -> Result<String, OAuthError> {
    let client_id = config
        .consumer_key()
        .ok_or(OAuthError::MissingConsumerCredentials)?;
    let redirect_uri = config.redirect_uri().ok_or(OAuthError::MissingRedirectUri)?;

    let query = [
        ("client_id", client_id.as_ref()),
        ("redirect_uri", redirect_uri),
        ("scope", COMPANY_FILE_SCOPE),
        ("response_type", "code"),
        ("state", state.as_ref()),
    ]
    .iter()
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&");

    Ok(format!("{}{AUTHORIZE_PATH}?{query}", config.oauth_base_url()))
}
