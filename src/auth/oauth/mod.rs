//! OAuth 2.0 authorization code flow for the MYOB cloud API.
//!
//! Only the handful of calls a mediated [`Session`](crate::Session) needs
//! are provided:
//!
//! 1. **Authorization** ([`begin_auth`], [`authorization_url`]): build the
//!    URL the user is sent to in order to grant access.
//! 2. **Code exchange** ([`exchange_code`], [`validate_auth_callback`]):
//!    trade the callback's code for an [`AccessToken`](crate::auth::AccessToken).
//! 3. **Refresh** ([`refresh_access_token`]): renew an expiring access token.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::auth::oauth::{begin_auth, validate_auth_callback, AuthQuery};
//!
//! let result = begin_auth(&config)?;
//! // Store result.state, redirect to result.auth_url
//!
//! let query = AuthQuery::new(code_from_callback, state_from_callback);
//! let token = validate_auth_callback(&config, &query, &stored_state).await?;
//! ```

mod authorize;
mod error;
mod state;
mod token_exchange;
mod token_refresh;

pub use authorize::{authorization_url, begin_auth, BeginAuthResult};
pub use error::OAuthError;
pub use state::StateParam;
pub use token_exchange::{exchange_code, validate_auth_callback, AuthQuery};
pub use token_refresh::refresh_access_token;
