//! AccountRight API version definitions.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// AccountRight API version, sent in the `x-myobapi-version` header.
///
/// ```rust
/// use myob_api::ApiVersion;
///
/// let version: ApiVersion = "v2".parse().unwrap();
/// assert_eq!(version, ApiVersion::latest());
/// assert_eq!(version.to_string(), "v2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    /// Version 2 of the AccountRight API.
    #[default]
    V2,
}

impl ApiVersion {
    /// Returns the latest supported API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2
    }

    /// Returns the header value for this version.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_v2_variants() {
        assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert_eq!("V2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        assert!(matches!(
            "v1".parse::<ApiVersion>(),
            Err(ConfigError::InvalidApiVersion { version }) if version == "v1"
        ));
    }
}
