//! The two ways of reaching an AccountRight server.
//!
//! A [`Connection`] is either a plain [`HttpClient`] talking to a
//! self-hosted server (direct mode) or an [`AccessToken`] that adds a bearer
//! token to every request (mediated mode). Callers see the same verbs in
//! both cases.

use std::collections::HashMap;

use crate::auth::AccessToken;
use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};

/// A transport for AccountRight requests.
#[derive(Clone, Debug)]
pub enum Connection {
    /// Requests go straight to a configured server.
    Direct(HttpClient),
    /// Requests carry an OAuth2 bearer token.
    Mediated(AccessToken),
}

// Verify Connection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Connection>();
};

impl Connection {
    /// Returns `true` for direct connections.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpMethod::Get, url, headers, None).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpMethod::Post, url, headers, Some(body)).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn put(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpMethod::Put, url, headers, Some(body)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpMethod::Delete, url, headers, None).await
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(method, url).extra_headers(headers.clone());
        if let Some(body) = body {
            builder = builder.body(body).body_type(DataType::Json);
        }
        let request = builder.build()?;

        match self {
            Self::Direct(client) => client.request(request).await,
            Self::Mediated(token) => token.request(request).await,
        }
    }
}
