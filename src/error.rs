//! Error types for client configuration.
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! values are rejected before any request is made.
//!
//! # Example
//!
//! ```rust
//! use myob_api::{ConsumerKey, ConfigError};
//!
//! let result = ConsumerKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyConsumerKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`MyobConfig`](crate::MyobConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Consumer key cannot be empty.
    #[error("Consumer key cannot be empty. Please provide the API key of your MYOB developer app.")]
    EmptyConsumerKey,

    /// Consumer secret cannot be empty.
    #[error("Consumer secret cannot be empty. Please provide the API secret of your MYOB developer app.")]
    EmptyConsumerSecret,

    /// A base URL is invalid.
    #[error("Invalid URL '{url}'. Please provide an absolute http(s) URL (e.g., 'http://localhost:8080/accountright/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected 'v2'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A direct server URL was combined with OAuth tokens.
    #[error("A direct server URL cannot be combined with OAuth access or refresh tokens.")]
    ConflictingConnectionModes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_consumer_key_error_message() {
        let message = ConfigError::EmptyConsumerKey.to_string();
        assert!(message.contains("Consumer key cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "localhost".to_string(),
        };
        assert!(error.to_string().contains("'localhost'"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::ConflictingConnectionModes;
        let _: &dyn std::error::Error = &error;
    }
}
