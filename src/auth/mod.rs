//! Authentication for mediated (cloud) connections.
//!
//! - [`AccessToken`]: an OAuth2 bearer token bound to an HTTP client
//! - [`AccessTokenResponse`]: the token endpoint's response body
//! - [`oauth`]: authorization URL, code exchange and token refresh
//!
//! Direct connections to a self-hosted server need none of this; company
//! file credentials are handled by the [`session`](crate::session) module.

mod access_token;
pub mod oauth;

pub use access_token::{AccessToken, AccessTokenResponse, MyobUser};
