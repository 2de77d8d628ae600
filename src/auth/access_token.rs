//! OAuth2 bearer tokens for mediated connections.
//!
//! An [`AccessToken`] pairs the bearer token MYOB issued with the
//! [`HttpClient`] that sends requests on its behalf. It offers the same
//! request contract as a direct client, plus [`AccessToken::refresh`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};

use crate::auth::oauth::{refresh_access_token, OAuthError};
use crate::clients::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::config::MyobConfig;

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// User details returned alongside a token.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MyobUser {
    /// The MYOB user's unique identifier.
    pub uid: String,
    /// The MYOB account username.
    pub username: String,
}

/// Body of a successful response from the MYOB token endpoint.
///
/// `expires_in` is sent as a string by the live service and as a number by
/// some proxies; both are accepted.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// The refresh token, if one was issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default, deserialize_with = "deserialize_expires_in")]
    pub expires_in: Option<i64>,
    /// The token type, normally `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// The granted scope.
    #[serde(default)]
    pub scope: Option<String>,
    /// The user that authorized the application.
    #[serde(default)]
    pub user: Option<MyobUser>,
}

fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(seconds)) => Ok(Some(seconds)),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// An OAuth2 access token bound to an HTTP client.
///
/// Requests sent through an `AccessToken` carry an
/// `Authorization: Bearer <token>` header.
///
/// The `Debug` implementation masks both tokens.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    http: HttpClient,
}

// Verify AccessToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AccessToken>();
};

impl AccessToken {
    /// Creates a token with an optional refresh token and expiry time.
    #[must_use]
    pub fn new(
        http: HttpClient,
        token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            token: token.into(),
            refresh_token,
            expires_at,
            http,
        }
    }

    /// Creates a token from a token endpoint response.
    ///
    /// The expiry is computed from `expires_in` relative to now.
    #[must_use]
    pub fn from_response(http: HttpClient, response: AccessTokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));
        Self::new(http, response.access_token, response.refresh_token, expires_at)
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns when the token expires, if known.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the token has a known expiry within the next minute.
    ///
    /// Tokens without a known expiry never report as expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) >= expires)
    }

    /// Returns `true` if the token can be refreshed.
    #[must_use]
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Sends `request` with the bearer token attached.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for validation, network, status or parse failures.
    pub async fn request(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request
            .extra_headers
            .get_or_insert_with(Default::default)
            .insert("Authorization".to_string(), format!("Bearer {}", self.token));
        self.http.request(request).await
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// The returned token keeps the current refresh token when MYOB does not
    /// issue a new one.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingRefreshToken`] if there is no refresh
    /// token, or the error from the token endpoint.
    pub async fn refresh(&self, config: &MyobConfig) -> Result<Self, OAuthError> {
        let refresh_token = self
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingRefreshToken)?;

        let mut refreshed = refresh_access_token(config, refresh_token).await?;
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
        }
        Ok(refreshed)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
