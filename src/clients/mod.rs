//! HTTP transport for AccountRight API communication.
//!
//! # Overview
//!
//! - [`HttpClient`]: async HTTP client applying default headers
//! - [`HttpRequest`]: a request against an absolute URL
//! - [`HttpResponse`]: a response with its JSON body parsed
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`DataType`]: content types for request bodies
//! - [`Connection`]: direct or OAuth-mediated transport with a common set of verbs
//! - [`HttpError`]: everything that can go wrong on the wire
//!
//! # Example
//!
//! ```rust,ignore
//! use myob_api::clients::{Connection, HttpClient};
//!
//! let client = HttpClient::new(None)?;
//! let connection = Connection::Direct(client);
//! let response = connection
//!     .get("http://localhost:8080/accountright/", &session.headers())
//!     .await?;
//! ```
//!
//! # Retry Behavior
//!
//! Nothing is retried. Non-2xx responses are returned as
//! [`HttpError::Response`] with the raw body, so the caller decides.

mod connection;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use connection::Connection;
pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, CLIENT_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
