//! Authentication provider of a user account.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where a user's identity is established.
///
/// Only `Local` accounts carry a password credential; the OAuth providers
/// authenticate elsewhere and are exempt from password presence checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    #[default]
    Local,
    Facebook,
    Twitter,
    Github,
    Google,
    Linkedin,
    Shopify,
    /// Any provider name not known to this crate.
    Other(String),
}

impl Provider {
    /// Returns the stored name of this provider.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Google => "google",
            Self::Linkedin => "linkedin",
            Self::Shopify => "shopify",
            Self::Other(name) => name,
        }
    }

    /// Whether this is the password-based local provider.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Provider {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "" | "local" => Self::Local,
            "facebook" => Self::Facebook,
            "twitter" => Self::Twitter,
            "github" => Self::Github,
            "google" => Self::Google,
            "linkedin" => Self::Linkedin,
            "shopify" => Self::Shopify,
            _ => Self::Other(s.to_owned()),
        }
    }
}

impl From<String> for Provider {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local() {
        assert_eq!(Provider::default(), Provider::Local);
        assert!(Provider::default().is_local());
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(Provider::from("GitHub"), Provider::Github);
        assert_eq!(Provider::from(""), Provider::Local);
        assert_eq!(
            Provider::from("okta"),
            Provider::Other("okta".to_owned())
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Provider::Shopify).unwrap();
        assert_eq!(json, "\"shopify\"");

        let parsed: Provider = serde_json::from_str("\"okta\"").unwrap();
        assert_eq!(parsed, Provider::Other("okta".to_owned()));
        assert!(!parsed.is_local());
    }
}
