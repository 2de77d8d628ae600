//! Configuration types for the MYOB AccountRight client.
//!
//! # Overview
//!
//! - [`MyobConfig`]: all settings a [`Session`](crate::Session) is built from
//! - [`MyobConfigBuilder`]: builder for [`MyobConfig`]
//! - [`ConsumerKey`] / [`ConsumerSecret`]: validated developer app credentials
//! - [`BaseUrl`]: a validated absolute URL with a trailing slash
//! - [`ApiVersion`]: the AccountRight API version header value
//!
//! # Connection Modes
//!
//! Setting [`MyobConfigBuilder::server_url`] selects *direct* mode: requests
//! go straight to a self-hosted AccountRight server and no OAuth is involved.
//! Without a server URL the client runs in *mediated* mode against the MYOB
//! cloud API with OAuth2 bearer tokens.
//!
//! # Example
//!
//! ```rust
//! use myob_api::{MyobConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = MyobConfig::builder()
//!     .consumer_key(ConsumerKey::new("my-api-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("my-secret").unwrap())
//!     .redirect_uri("http://localhost:5000/callback")
//!     .build()
//!     .unwrap();
//!
//! assert!(!config.is_direct());
//! ```

mod newtypes;
mod version;

pub use newtypes::{BaseUrl, ConsumerKey, ConsumerSecret};
pub use version::ApiVersion;

use crate::error::ConfigError;
use crate::session::CompanyFileSelection;

/// Base URL of the MYOB cloud AccountRight API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.myob.com/accountright/";

/// Base URL of the MYOB OAuth2 service.
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://secure.myob.com/";

/// Configuration for an AccountRight [`Session`](crate::Session).
///
/// # Thread Safety
///
/// `MyobConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct MyobConfig {
    consumer_key: Option<ConsumerKey>,
    consumer_secret: Option<ConsumerSecret>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    redirect_uri: Option<String>,
    server_url: Option<BaseUrl>,
    api_base_url: BaseUrl,
    oauth_base_url: BaseUrl,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
    company_file: Option<CompanyFileSelection>,
}

impl MyobConfig {
    /// Creates a new builder for constructing a `MyobConfig`.
    #[must_use]
    pub fn builder() -> MyobConfigBuilder {
        MyobConfigBuilder::new()
    }

    /// Returns the consumer key, if configured.
    #[must_use]
    pub const fn consumer_key(&self) -> Option<&ConsumerKey> {
        self.consumer_key.as_ref()
    }

    /// Returns the consumer secret, if configured.
    #[must_use]
    pub const fn consumer_secret(&self) -> Option<&ConsumerSecret> {
        self.consumer_secret.as_ref()
    }

    /// Returns the initial OAuth access token, if configured.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the OAuth refresh token, if configured.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the OAuth redirect URI, if configured.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Returns the direct server URL, if configured.
    #[must_use]
    pub const fn server_url(&self) -> Option<&BaseUrl> {
        self.server_url.as_ref()
    }

    /// Returns `true` when requests go directly to a configured server.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.server_url.is_some()
    }

    /// Returns the base URL for API requests.
    ///
    /// This is the server URL in direct mode and the cloud API URL otherwise.
    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        self.server_url.as_ref().unwrap_or(&self.api_base_url)
    }

    /// Returns the base URL of the OAuth2 service.
    #[must_use]
    pub const fn oauth_base_url(&self) -> &BaseUrl {
        &self.oauth_base_url
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the company file to select when the session connects.
    #[must_use]
    pub const fn company_file(&self) -> Option<&CompanyFileSelection> {
        self.company_file.as_ref()
    }
}

// Verify MyobConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MyobConfig>();
};

/// Builder for [`MyobConfig`].
///
/// Every field is optional. Defaults:
///
/// - `api_base_url`: [`DEFAULT_API_BASE_URL`]
/// - `oauth_base_url`: [`DEFAULT_OAUTH_BASE_URL`]
/// - `api_version`: [`ApiVersion::latest`]
///
/// Empty token and redirect strings are treated as unset.
#[derive(Debug, Default)]
pub struct MyobConfigBuilder {
    consumer_key: Option<ConsumerKey>,
    consumer_secret: Option<ConsumerSecret>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    redirect_uri: Option<String>,
    server_url: Option<String>,
    api_base_url: Option<String>,
    oauth_base_url: Option<String>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
    company_file: Option<CompanyFileSelection>,
}

impl MyobConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the consumer (API) key.
    #[must_use]
    pub fn consumer_key(mut self, key: ConsumerKey) -> Self {
        self.consumer_key = Some(key);
        self
    }

    /// Sets the consumer secret.
    #[must_use]
    pub fn consumer_secret(mut self, secret: ConsumerSecret) -> Self {
        self.consumer_secret = Some(secret);
        self
    }

    /// Sets a previously obtained OAuth access token.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets a previously obtained OAuth refresh token.
    #[must_use]
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Sets the OAuth redirect URI registered with the developer app.
    #[must_use]
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Sets a direct AccountRight server URL, selecting direct mode.
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Overrides the cloud API base URL.
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Overrides the OAuth2 service base URL.
    #[must_use]
    pub fn oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_base_url = Some(url.into());
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the company file to select when the session connects.
    #[must_use]
    pub fn company_file(mut self, selection: CompanyFileSelection) -> Self {
        self.company_file = Some(selection);
        self
    }

    /// Builds the [`MyobConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if any URL is malformed and
    /// [`ConfigError::ConflictingConnectionModes`] if a server URL is combined
    /// with OAuth tokens.
    pub fn build(self) -> Result<MyobConfig, ConfigError> {
        let access_token = self.access_token.filter(|t| !t.is_empty());
        let refresh_token = self.refresh_token.filter(|t| !t.is_empty());
        let server_url = self.server_url.map(BaseUrl::new).transpose()?;

        if server_url.is_some() && (access_token.is_some() || refresh_token.is_some()) {
            return Err(ConfigError::ConflictingConnectionModes);
        }

        let api_base_url = BaseUrl::new(
            self.api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let oauth_base_url = BaseUrl::new(
            self.oauth_base_url
                .unwrap_or_else(|| DEFAULT_OAUTH_BASE_URL.to_string()),
        )?;

        Ok(MyobConfig {
            consumer_key: self.consumer_key,
            consumer_secret: self.consumer_secret,
            access_token,
            refresh_token,
            redirect_uri: self.redirect_uri.filter(|u| !u.is_empty()),
            server_url,
            api_base_url,
            oauth_base_url,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            user_agent_prefix: self.user_agent_prefix,
            company_file: self.company_file,
        })
    }
}
