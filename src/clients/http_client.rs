//! HTTP client for AccountRight API communication.
//!
//! This module provides the [`HttpClient`] type, a thin wrapper around
//! reqwest that applies default headers, validates requests and parses
//! JSON responses. It never retries.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::MyobConfig;

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the AccountRight API.
///
/// Default headers (`User-Agent`, `Accept`) are applied to every request;
/// per-request headers are merged over them without changing the defaults.
///
/// Cloning is cheap: the underlying connection pool is shared.
///
/// # Example
///
/// ```rust,ignore
/// use myob_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let client = HttpClient::new(None)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8080/accountright/")
///     .header("x-myobapi-version", "v2")
///     .build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// Requests carry absolute URLs, so the client holds no base URI.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: Option<&MyobConfig>) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .and_then(MyobConfig::user_agent_prefix)
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}MYOB AccountRight API Library v{CLIENT_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    /// - A 2xx response body is not valid JSON (`Parse`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, url = %request.url, "Sending AccountRight request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        tracing::debug!(status = code, url = %request.url, "Received AccountRight response");

        if !(200..300).contains(&code) {
            return Err(HttpError::Response(HttpResponseError {
                code,
                message: body_text,
                url: request.url,
            }));
        }

        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text).map_err(|source| HttpError::Parse {
                url: request.url.clone(),
                source,
            })?
        };

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::DataType;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("MYOB AccountRight API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = MyobConfig::builder()
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(Some(&config)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(None).unwrap();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_request_merges_extra_headers_and_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accountright/"))
            .and(header("x-myobapi-version", "v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Name": "Acme"}])))
            .mount(&server)
            .await;

        let client = HttpClient::new(None).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, format!("{}/accountright/", server.uri()))
            .header("x-myobapi-version", "v2")
            .build()
            .unwrap();

        let response = client.request(request).await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body, json!([{"Name": "Acme"}]));
        assert!(!client.default_headers().contains_key("x-myobapi-version"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cf/Contact/Customer"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"CompanyName": "Acme"})))
            .respond_with(ResponseTemplate::new(201).insert_header("Location", "http://x/uid-1"))
            .mount(&server)
            .await;

        let client = HttpClient::new(None).unwrap();
        let request = HttpRequest::builder(
            HttpMethod::Post,
            format!("{}/cf/Contact/Customer", server.uri()),
        )
        .body(json!({"CompanyName": "Acme"}))
        .body_type(DataType::Json)
        .build()
        .unwrap();

        let response = client.request(request).await.unwrap();
        assert_eq!(response.code, 201);
        assert!(response.body.is_null());
        assert_eq!(response.location(), Some("http://x/uid-1"));
    }

    #[tokio::test]
    async fn test_non_success_status_returns_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = HttpClient::new(None).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, format!("{}/cf/", server.uri()))
            .build()
            .unwrap();

        let result = client.request(request).await;
        assert!(matches!(
            result,
            Err(HttpError::Response(HttpResponseError { code: 401, ref message, .. })) if message == "Unauthorized"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_returns_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(None).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, format!("{}/cf/", server.uri()))
            .build()
            .unwrap();

        let result = client.request(request).await;
        assert!(matches!(result, Err(HttpError::Parse { .. })));
    }
}
