//! Query-string building for AccountRight's OData options.
//!
//! AccountRight accepts the OData system query options `$orderby`, `$top`,
//! `$skip` and `$filter`. [`QueryParams`] adds the `$` prefix for those
//! keys, passes any other key through unchanged and percent-encodes every
//! value.
//!
//! # Example
//!
//! ```rust
//! use myob_api::rest::QueryParams;
//!
//! let params = QueryParams::new()
//!     .orderby("Name")
//!     .top(5)
//!     .filter_eq("IsActive", "true");
//!
//! assert_eq!(
//!     params.to_query_string(),
//!     "$orderby=Name&$top=5&$filter=IsActive%20eq%20%27true%27"
//! );
//! ```

use std::fmt;

/// Keys emitted with an OData `$` prefix.
const ODATA_KEYS: [&str; 4] = ["orderby", "top", "skip", "filter"];

/// The value of a single query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// A literal value, emitted as-is after encoding.
    Text(String),
    /// Field/value pairs, emitted as `field eq 'value'` clauses joined by
    /// ` and `. Only meaningful for `filter`.
    Equals(Vec<(String, String)>),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Equals(pairs) => pairs
                .iter()
                .map(|(field, value)| format!("{field} eq '{}'", value.replace('\'', "\\'")))
                .collect::<Vec<_>>()
                .join(" and "),
        }
    }
}

/// Ordered query parameters for a resource request.
///
/// Setting a key that is already present replaces its value in place, so
/// parameters keep the order in which they were first added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `$orderby`.
    #[must_use]
    pub fn orderby(self, expression: impl Into<String>) -> Self {
        self.param("orderby", expression)
    }

    /// Sets `$top`, the maximum number of items returned.
    #[must_use]
    pub fn top(self, count: u64) -> Self {
        self.param("top", count.to_string())
    }

    /// Sets `$skip`, the number of items skipped.
    #[must_use]
    pub fn skip(self, count: u64) -> Self {
        self.param("skip", count.to_string())
    }

    /// Sets `$filter` to a literal OData expression.
    ///
    /// The expression is encoded but otherwise sent as written.
    #[must_use]
    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.param("filter", expression)
    }

    /// Adds a `field eq 'value'` clause to `$filter`.
    ///
    /// Clauses accumulate and are joined with ` and `. Single quotes in
    /// `value` are escaped with a backslash. A literal filter set earlier is
    /// replaced.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let clause = (field.into(), value.into());
        match self.params.iter_mut().find(|(key, _)| key == "filter") {
            Some((_, QueryValue::Equals(pairs))) => pairs.push(clause),
            Some((_, existing)) => *existing = QueryValue::Equals(vec![clause]),
            None => self
                .params
                .push(("filter".to_string(), QueryValue::Equals(vec![clause]))),
        }
        self
    }

    /// Sets an arbitrary parameter.
    ///
    /// `orderby`, `top`, `skip` and `filter` gain a `$` prefix when the query
    /// string is built; other keys are sent unprefixed.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key.into(), QueryValue::Text(value.into()));
        self
    }

    fn set(&mut self, key: String, value: QueryValue) {
        match self.params.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((key, value)),
        }
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Builds the query string, without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                let prefix = if ODATA_KEYS.contains(&key.as_str()) { "$" } else { "" };
                format!(
                    "{prefix}{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.render())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
