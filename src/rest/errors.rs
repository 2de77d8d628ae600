//! Error type for resource model operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::rest::ModelError;
//!
//! match customers.next_page(None).await {
//!     Ok(page) => println!("{page}"),
//!     Err(ModelError::NoNextPage) => println!("done"),
//!     Err(ModelError::Http(e)) => println!("request failed: {e}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use crate::auth::oauth::OAuthError;
use crate::clients::HttpError;
use thiserror::Error;

/// Error type for [`Model`](crate::rest::Model) and
/// [`Session`](crate::Session) operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A URL was needed for a company-file resource before any company file
    /// was selected.
    #[error("No company file selected; call select_company_file first")]
    NoCompanyFileSelected,

    /// `next_page` was called without a pagination cursor.
    #[error("No next page available")]
    NoNextPage,

    /// The response did not have the shape the operation relies on.
    #[error("Unexpected response shape for {operation}: expected {expected}")]
    UnexpectedShape {
        /// The operation that inspected the response.
        operation: &'static str,
        /// A description of the expected shape.
        expected: &'static str,
    },

    /// No resource kind is registered under this name.
    #[error("Unknown resource kind '{name}'")]
    UnknownResourceKind {
        /// The requested kind name.
        name: String,
    },

    /// An operation that targets one record was given a record without a `UID`.
    #[error("Record has no UID")]
    MissingId,

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Obtaining a mediated connection failed.
    #[error(transparent)]
    OAuth(#[from] OAuthError),
}

// Verify ModelError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ModelError>();
};
