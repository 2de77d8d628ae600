//! # MYOB AccountRight API client
//!
//! An async Rust client for the MYOB AccountRight REST API, for both the
//! MYOB cloud service and self-hosted AccountRight servers.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`MyobConfig`] and [`MyobConfigBuilder`]
//! - Two connection modes: *direct* to a configured server, or *mediated*
//!   through the cloud API with OAuth2 bearer tokens ([`auth::oauth`])
//! - Company file selection by name or ID, with token or username/password
//!   credentials ([`Session::select_company_file`])
//! - A generic resource model ([`rest::Model`]) with OData query options,
//!   `NextPageLink` pagination and create-or-update persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use myob_api::{MyobConfig, Session};
//!
//! let config = MyobConfig::builder()
//!     .server_url("http://localhost:8080/accountright")
//!     .build()
//!     .unwrap();
//!
//! let session = Session::new(config);
//! assert!(session.is_direct());
//! assert_eq!(session.base_url(), "http://localhost:8080/accountright/");
//! ```
//!
//! ## Working With Records
//!
//! ```rust,ignore
//! use myob_api::{MyobConfig, Session};
//! use myob_api::rest::{QueryParams, Record};
//! use myob_api::session::CompanyFileSelection;
//!
//! let session = Session::new(config);
//! session
//!     .select_company_file(&CompanyFileSelection::by_name("Clearwater").with_login("Administrator", ""))
//!     .await?;
//!
//! let mut customers = session.model("Customer")?;
//! let active = customers
//!     .all_items(Some(&QueryParams::new().filter_eq("IsActive", "true")))
//!     .await?;
//!
//! customers
//!     .save(&Record::new().with("CompanyName", "Acme").with("IsIndividual", false))
//!     .await?;
//! ```
//!
//! ## OAuth Authentication
//!
//! For the MYOB cloud API:
//!
//! ```rust,ignore
//! use myob_api::{ConsumerKey, ConsumerSecret, MyobConfig, Session};
//!
//! let config = MyobConfig::builder()
//!     .consumer_key(ConsumerKey::new("your-key")?)
//!     .consumer_secret(ConsumerSecret::new("your-secret")?)
//!     .redirect_uri("http://localhost:5000/callback")
//!     .build()?;
//! let session = Session::new(config);
//!
//! let auth = session.authorization_url()?;
//! // Redirect the user to auth.auth_url, then on the callback:
//! session.exchange_code(&code).await?;
//! ```

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod session;

// Re-export public types at crate root for convenience
pub use config::{
    ApiVersion, BaseUrl, ConsumerKey, ConsumerSecret, MyobConfig, MyobConfigBuilder,
};
pub use error::ConfigError;
pub use session::Session;

// Re-export HTTP client types
pub use clients::{
    Connection, DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError,
};

// Re-export auth types
pub use auth::oauth::{BeginAuthResult, OAuthError, StateParam};
pub use auth::AccessToken;

// Re-export resource model types
pub use rest::{Model, ModelError, QueryParams, Record};
