//! Company file selection and the resolved tenant descriptor.
//!
//! A company file is selected by exact name or ID from the list the server
//! returns at its root URL. The caller may supply the company file's
//! credentials either as a ready-made token or as a username and password,
//! which are combined into the base64 `username:password` token AccountRight
//! expects in the `x-myobapi-cftoken` header.
//!
//! # Example
//!
//! ```rust
//! use myob_api::session::CompanyFileSelection;
//!
//! let selection = CompanyFileSelection::by_name("Clearwater").with_login("Administrator", "");
//! assert_eq!(selection.token(), "QWRtaW5pc3RyYXRvcjo=");
//! ```

use std::fmt;

use base64::prelude::*;
use serde_json::Value;

const ID_FIELD: &str = "Id";
const NAME_FIELD: &str = "Name";
const URI_FIELD: &str = "Uri";

/// How to pick a company file from the server's list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompanyFileSelector {
    /// Match the `Name` field exactly.
    Name(String),
    /// Match the `Id` field exactly.
    Id(String),
}

impl CompanyFileSelector {
    /// Returns `true` if a company-file list entry matches.
    #[must_use]
    pub fn matches(&self, entry: &Value) -> bool {
        let (field, expected) = match self {
            Self::Name(name) => (NAME_FIELD, name),
            Self::Id(id) => (ID_FIELD, id),
        };
        entry.get(field).and_then(Value::as_str) == Some(expected.as_str())
    }
}

impl fmt::Display for CompanyFileSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name '{name}'"),
            Self::Id(id) => write!(f, "id '{id}'"),
        }
    }
}

/// Credentials for a company file.
#[derive(Clone, PartialEq, Eq)]
pub enum CompanyFileCredentials {
    /// A precomputed `x-myobapi-cftoken` value.
    Token(String),
    /// A company file username and password.
    Login {
        /// The company file username.
        username: String,
        /// The company file password, possibly empty.
        password: String,
    },
}

impl CompanyFileCredentials {
    /// Returns the `x-myobapi-cftoken` value for these credentials.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::Token(token) => token.clone(),
            Self::Login { username, password } => {
                BASE64_STANDARD.encode(format!("{username}:{password}"))
            }
        }
    }
}

impl fmt::Debug for CompanyFileCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(*****)"),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"*****")
                .finish(),
        }
    }
}

/// A request to select a company file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyFileSelection {
    /// Which company file to select.
    pub selector: CompanyFileSelector,
    /// Credentials for the company file, if it requires any.
    pub credentials: Option<CompanyFileCredentials>,
}

impl CompanyFileSelection {
    /// Selects the company file with this exact name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            selector: CompanyFileSelector::Name(name.into()),
            credentials: None,
        }
    }

    /// Selects the company file with this exact ID.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            selector: CompanyFileSelector::Id(id.into()),
            credentials: None,
        }
    }

    /// Authenticates with a precomputed token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(CompanyFileCredentials::Token(token.into()));
        self
    }

    /// Authenticates with a username and password.
    #[must_use]
    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(CompanyFileCredentials::Login {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Returns the company file token, empty when no credentials were given.
    #[must_use]
    pub fn token(&self) -> String {
        self.credentials
            .as_ref()
            .map(CompanyFileCredentials::token)
            .unwrap_or_default()
    }
}

/// The selected company file.
#[derive(Clone, PartialEq, Eq)]
pub struct CompanyFileContext {
    id: String,
    token: String,
    base_url: Option<String>,
}

impl CompanyFileContext {
    /// Creates a descriptor directly, for callers that already know the
    /// company file.
    #[must_use]
    pub fn new(id: impl Into<String>, token: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            base_url: base_url.filter(|url| !url.is_empty()),
        }
    }

    /// Builds a descriptor from an entry of the company-file list.
    #[must_use]
    pub fn from_entry(entry: &Value, token: impl Into<String>) -> Self {
        let field = |name: &str| entry.get(name).and_then(Value::as_str).map(str::to_string);
        Self::new(field(ID_FIELD).unwrap_or_default(), token, field(URI_FIELD))
    }

    /// Returns the company file ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the `x-myobapi-cftoken` value, empty when none is needed.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the company file's own URI, if the server reported one.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns the URL of `route` within this company file.
    ///
    /// The company file URI is used when known; otherwise the ID is appended
    /// to `api_base_url`, which must end with `/`.
    #[must_use]
    pub fn resource_url(&self, api_base_url: &str, route: &str) -> String {
        match &self.base_url {
            Some(uri) => format!("{}/{route}", uri.trim_end_matches('/')),
            None => format!("{api_base_url}{}/{route}", self.id),
        }
    }
}

impl fmt::Debug for CompanyFileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanyFileContext")
            .field("id", &self.id)
            .field("token", &if self.token.is_empty() { "" } else { "*****" })
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selector_matches_exact_name_or_id() {
        let entry = json!({"Id": "cf-1", "Name": "Acme", "Uri": "http://x/cf-1"});

        assert!(CompanyFileSelector::Name("Acme".to_string()).matches(&entry));
        assert!(!CompanyFileSelector::Name("acme".to_string()).matches(&entry));
        assert!(CompanyFileSelector::Id("cf-1".to_string()).matches(&entry));
        assert!(!CompanyFileSelector::Id("Acme".to_string()).matches(&entry));
    }

    #[test]
    fn test_login_credentials_become_base64_token() {
        let selection = CompanyFileSelection::by_name("Acme").with_login("user", "pass");
        assert_eq!(selection.token(), "dXNlcjpwYXNz");
    }

    #[test]
    fn test_token_credentials_pass_through() {
        let selection = CompanyFileSelection::by_id("cf-1").with_token("abc");
        assert_eq!(selection.token(), "abc");
        assert_eq!(CompanyFileSelection::by_id("cf-1").token(), "");
    }

    #[test]
    fn test_credentials_debug_masks_secrets() {
        let login = CompanyFileCredentials::Login {
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{login:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));

        let token = format!("{:?}", CompanyFileCredentials::Token("secret".to_string()));
        assert!(!token.contains("secret"));
    }

    #[test]
    fn test_context_from_entry() {
        let entry = json!({"Id": "cf-1", "Name": "Acme", "Uri": "http://x/accountright/cf-1"});
        let context = CompanyFileContext::from_entry(&entry, "tok");

        assert_eq!(context.id(), "cf-1");
        assert_eq!(context.token(), "tok");
        assert_eq!(context.base_url(), Some("http://x/accountright/cf-1"));
    }

    #[test]
    fn test_resource_url_prefers_uri() {
        let with_uri = CompanyFileContext::new("cf-1", "", Some("http://x/cf-1/".to_string()));
        assert_eq!(
            with_uri.resource_url("http://ignored/", "Contact/Customer"),
            "http://x/cf-1/Contact/Customer"
        );

        let without_uri = CompanyFileContext::new("cf-1", "", Some(String::new()));
        assert_eq!(
            without_uri.resource_url("https://api.myob.com/accountright/", "Contact/Customer"),
            "https://api.myob.com/accountright/cf-1/Contact/Customer"
        );
    }
}
