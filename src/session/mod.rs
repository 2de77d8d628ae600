//! The AccountRight session: tenant resolution, headers and connections.
//!
//! A [`Session`] owns the configuration and everything derived from it:
//!
//! - the selected company file ([`CompanyFileContext`]),
//! - a cached [`Connection`], direct or OAuth-mediated,
//! - a cached company-file list,
//! - the [`ResourceRegistry`] used by [`Session::model`].
//!
//! # Company File Selection
//!
//! Until a company file is selected only the root (company-file list) kind
//! can be queried. [`Session::select_company_file`] fetches the list and
//! picks an entry by exact name or ID. An unmatched selection is not an
//! error: the session is left without a company file and `Ok(None)` is
//! returned.
//!
//! # Token Refresh
//!
//! In mediated mode a configured refresh token is exchanged once, on first
//! use, because a configured access token has no known expiry. Afterwards a
//! token is refreshed again only when its known expiry has passed.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::{MyobConfig, Session};
//! use myob_api::session::CompanyFileSelection;
//!
//! let config = MyobConfig::builder()
//!     .server_url("http://localhost:8080/accountright")
//!     .build()?;
//! let session = Session::new(config);
//!
//! let selection = CompanyFileSelection::by_name("Clearwater").with_login("Administrator", "");
//! if session.select_company_file(&selection).await?.is_none() {
//!     eprintln!("no such company file");
//! }
//!
//! let mut customers = session.model("Customer")?;
//! let items = customers.all_items(None).await?;
//! ```

mod company_file;

pub use company_file::{
    CompanyFileContext, CompanyFileCredentials, CompanyFileSelection, CompanyFileSelector,
};

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::oauth::{self, BeginAuthResult, OAuthError};
use crate::auth::AccessToken;
use crate::clients::{Connection, HttpClient};
use crate::config::MyobConfig;
use crate::rest::{Model, ModelError, ResourceKind, ResourceRegistry};

/// Header carrying the API version.
pub const VERSION_HEADER: &str = "x-myobapi-version";
/// Header carrying the company file token.
pub const COMPANY_FILE_TOKEN_HEADER: &str = "x-myobapi-cftoken";
/// Header carrying the developer consumer key.
pub const CONSUMER_KEY_HEADER: &str = "x-myobapi-key";

/// An AccountRight session.
///
/// `Session` is `Send + Sync`; share it between tasks behind an `Arc`.
#[derive(Debug)]
pub struct Session {
    config: MyobConfig,
    registry: ResourceRegistry,
    company_file: RwLock<Option<CompanyFileContext>>,
    company_files: RwLock<Option<Vec<Value>>>,
    connection: Mutex<Option<Connection>>,
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};

impl Session {
    /// Creates a session with the default resource registry.
    ///
    /// No request is made; see [`Session::connect`] to also apply the
    /// configured company file.
    #[must_use]
    pub fn new(config: MyobConfig) -> Self {
        Self::with_registry(config, ResourceRegistry::with_defaults())
    }

    /// Creates a session with a custom resource registry.
    #[must_use]
    pub fn with_registry(config: MyobConfig, registry: ResourceRegistry) -> Self {
        Self {
            config,
            registry,
            company_file: RwLock::new(None),
            company_files: RwLock::new(None),
            connection: Mutex::new(None),
        }
    }

    /// Creates a session and selects the company file named in the
    /// configuration, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if fetching the company-file list fails.
    pub async fn connect(config: MyobConfig) -> Result<Self, ModelError> {
        let session = Self::new(config);
        if let Some(selection) = session.config.company_file() {
            session.select_company_file(selection).await?;
        }
        Ok(session)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MyobConfig {
        &self.config
    }

    /// Returns the resource registry.
    #[must_use]
    pub const fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Returns the resource registry for registering more kinds.
    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    /// Returns `true` in direct mode.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.config.is_direct()
    }

    /// Returns the API base URL: the server URL in direct mode, the cloud
    /// API URL otherwise.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url().as_ref()
    }

    /// Creates a model for a registered resource kind.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownResourceKind`] if `name` is not registered.
    pub fn model(&self, name: &str) -> Result<Model<'_>, ModelError> {
        let kind = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownResourceKind {
                name: name.to_string(),
            })?;
        Ok(Model::new(self, kind))
    }

    /// Derives the AccountRight headers for the next request.
    ///
    /// Always includes the API version and JSON content type. The company
    /// file token and consumer key are included only when present.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            VERSION_HEADER.to_string(),
            self.config.api_version().to_string(),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        if let Some(company_file) = self.read_company_file().as_ref() {
            if !company_file.token().is_empty() {
                headers.insert(
                    COMPANY_FILE_TOKEN_HEADER.to_string(),
                    company_file.token().to_string(),
                );
            }
        }

        if let Some(key) = self.config.consumer_key() {
            headers.insert(CONSUMER_KEY_HEADER.to_string(), key.as_ref().to_string());
        }

        headers
    }

    /// Returns the connection for the next request.
    ///
    /// In direct mode this is a cached plain client; model URLs already point
    /// at the configured server. In mediated mode it is a cached access
    /// token, refreshed first when a refresh token is available and either
    /// the token came from configuration or its expiry has passed.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MissingAccessToken`] in mediated mode without any token
    /// - any error from refreshing the token
    pub async fn connection(&self) -> Result<Connection, OAuthError> {
        let mut cached = self.connection.lock().await;

        if self.is_direct() {
            if let Some(connection) = cached.as_ref() {
                return Ok(connection.clone());
            }
            let client = HttpClient::new(Some(&self.config))?;
            let connection = Connection::Direct(client);
            *cached = Some(connection.clone());
            return Ok(connection);
        }

        let token = match cached.as_ref() {
            Some(Connection::Mediated(token)) if token.expired() && token.is_refreshable() => {
                tracing::warn!("Access token expired, refreshing");
                token.refresh(&self.config).await?
            }
            Some(connection) => return Ok(connection.clone()),
            None => self.initial_token().await?,
        };

        let connection = Connection::Mediated(token);
        *cached = Some(connection.clone());
        Ok(connection)
    }

    async fn initial_token(&self) -> Result<AccessToken, OAuthError> {
        let http = HttpClient::new(Some(&self.config))?;
        let token = AccessToken::new(
            http,
            self.config.access_token().unwrap_or_default(),
            self.config.refresh_token().map(str::to_string),
            None,
        );

        if token.is_refreshable() {
            tracing::debug!("Refreshing configured access token");
            return token.refresh(&self.config).await;
        }
        if token.token().is_empty() {
            return Err(OAuthError::MissingAccessToken);
        }
        Ok(token)
    }

    /// Builds the URL that starts the OAuth authorization code flow.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::DirectConnection`] in direct mode, or the
    /// error from [`oauth::begin_auth`].
    pub fn authorization_url(&self) -> Result<BeginAuthResult, OAuthError> {
        if self.is_direct() {
            return Err(OAuthError::DirectConnection);
        }
        oauth::begin_auth(&self.config)
    }

    /// Exchanges an authorization code and caches the resulting token as
    /// this session's connection.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::DirectConnection`] in direct mode, or the
    /// error from [`oauth::exchange_code`].
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, OAuthError> {
        if self.is_direct() {
            return Err(OAuthError::DirectConnection);
        }
        let token = oauth::exchange_code(&self.config, code).await?;
        *self.connection.lock().await = Some(Connection::Mediated(token.clone()));
        Ok(token)
    }

    /// Selects a company file by exact name or ID.
    ///
    /// The cached company-file list is discarded and fetched again. Login
    /// credentials are turned into a base64 `username:password` token.
    ///
    /// Returns the new descriptor, or `Ok(None)` when nothing matched, in
    /// which case the previous selection is cleared. If the list cannot be
    /// fetched the previous selection is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the company-file list cannot be fetched or
    /// is not an array.
    pub async fn select_company_file(
        &self,
        selection: &CompanyFileSelection,
    ) -> Result<Option<CompanyFileContext>, ModelError> {
        *self.write_company_files() = None;

        let files = self.company_files().await?;
        let Some(entry) = files
            .iter()
            .find(|entry| selection.selector.matches(entry))
        else {
            tracing::warn!(selector = %selection.selector, "Company file not found");
            self.clear_company_file();
            return Ok(None);
        };

        let context = CompanyFileContext::from_entry(entry, selection.token());
        tracing::debug!(id = context.id(), "Selected company file");
        self.set_company_file(context.clone());
        Ok(Some(context))
    }

    /// Returns the company files available to this session.
    ///
    /// The list is fetched once and cached until the next
    /// [`select_company_file`](Self::select_company_file).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnexpectedShape`] if the server does not return
    /// an array, or any request error.
    pub async fn company_files(&self) -> Result<Vec<Value>, ModelError> {
        if let Some(files) = self.read_company_files().as_ref() {
            return Ok(files.clone());
        }

        let mut model = Model::new(self, ResourceKind::company_file());
        let Value::Array(files) = model.records(None).await? else {
            return Err(ModelError::UnexpectedShape {
                operation: "company_files",
                expected: "an array of company files",
            });
        };

        tracing::debug!(count = files.len(), "Fetched company file list");
        *self.write_company_files() = Some(files.clone());
        Ok(files)
    }

    /// Returns the selected company file.
    #[must_use]
    pub fn company_file(&self) -> Option<CompanyFileContext> {
        self.read_company_file().clone()
    }

    /// Selects a company file without consulting the server.
    pub fn set_company_file(&self, context: CompanyFileContext) {
        *self.write_company_file() = Some(context);
    }

    /// Forgets the selected company file.
    pub fn clear_company_file(&self) {
        *self.write_company_file() = None;
    }

    fn read_company_file(&self) -> RwLockReadGuard<'_, Option<CompanyFileContext>> {
        self.company_file
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_company_file(&self) -> RwLockWriteGuard<'_, Option<CompanyFileContext>> {
        self.company_file
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_company_files(&self) -> RwLockReadGuard<'_, Option<Vec<Value>>> {
        self.company_files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_company_files(&self) -> RwLockWriteGuard<'_, Option<Vec<Value>>> {
        self.company_files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
