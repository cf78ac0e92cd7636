//! Storefront identity and validation of user-supplied storefront URLs.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static STOREFRONT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid storefront name regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorefrontError {
    #[error("storefront name is empty")]
    Empty,

    #[error("invalid storefront name \"{0}\": only letters, digits, '_' and '-' are allowed")]
    InvalidName(String),

    #[error("\"{input}\" is not a storefront URL under {base_url}")]
    NotUnderBaseUrl { input: String, base_url: String },
}

/// A validated storefront path segment, e.g. `dongsmarkett`.
///
/// Guaranteed free of path separators and `..`, so it can be embedded in URLs
/// and referer headers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorefrontName(String);

impl StorefrontName {
    /// Validates a bare storefront name.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Empty`] or [`StorefrontError::InvalidName`].
    pub fn parse(name: &str) -> Result<Self, StorefrontError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorefrontError::Empty);
        }
        if name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || !STOREFRONT_NAME.is_match(name)
        {
            return Err(StorefrontError::InvalidName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Extracts the storefront name from a full URL such as
    /// `https://smartstore.naver.com/dongsmarkett`.
    ///
    /// A trailing slash is tolerated; any deeper path is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotUnderBaseUrl`] if `input` does not start
    /// with `base_url`, or the errors of [`StorefrontName::parse`].
    pub fn from_store_url(base_url: &str, input: &str) -> Result<Self, StorefrontError> {
        let base = base_url.trim_end_matches('/');
        let input = input.trim();
        let rest = input
            .strip_prefix(base)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| StorefrontError::NotUnderBaseUrl {
                input: input.to_string(),
                base_url: base.to_string(),
            })?;
        Self::parse(rest.strip_suffix('/').unwrap_or(rest))
    }

    /// Accepts either a full storefront URL or a bare name.
    ///
    /// # Errors
    ///
    /// See [`StorefrontName::from_store_url`] and [`StorefrontName::parse`].
    pub fn from_input(base_url: &str, input: &str) -> Result<Self, StorefrontError> {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::from_store_url(base_url, trimmed)
        } else {
            Self::parse(trimmed)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorefrontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorefrontName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://smartstore.naver.com";

    #[test]
    fn parse_accepts_simple_name() {
        let name = StorefrontName::parse("dongsmarkett").unwrap();
        assert_eq!(name.as_str(), "dongsmarkett");
    }

    #[test]
    fn parse_trims_whitespace() {
        let name = StorefrontName::parse("  bean_shop-2 \n").unwrap();
        assert_eq!(name.as_str(), "bean_shop-2");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(StorefrontName::parse("   "), Err(StorefrontError::Empty));
    }

    #[test]
    fn parse_rejects_traversal_and_separators() {
        for bad in ["..", "a/b", r"a\b", "shop.name", "shop?x=1", "가게"] {
            assert!(
                matches!(StorefrontName::parse(bad), Err(StorefrontError::InvalidName(_))),
                "expected InvalidName for {bad:?}"
            );
        }
    }

    #[test]
    fn from_store_url_extracts_name() {
        let name =
            StorefrontName::from_store_url(BASE, "https://smartstore.naver.com/dongsmarkett")
                .unwrap();
        assert_eq!(name.as_str(), "dongsmarkett");
    }

    #[test]
    fn from_store_url_tolerates_trailing_slash() {
        let name =
            StorefrontName::from_store_url(BASE, "https://smartstore.naver.com/dongsmarkett/")
                .unwrap();
        assert_eq!(name.as_str(), "dongsmarkett");
    }

    #[test]
    fn from_store_url_rejects_other_host() {
        let err =
            StorefrontName::from_store_url(BASE, "https://shopping.example.com/dongsmarkett")
                .unwrap_err();
        assert!(matches!(err, StorefrontError::NotUnderBaseUrl { .. }));
    }

    #[test]
    fn from_store_url_rejects_deeper_path() {
        let err = StorefrontName::from_store_url(
            BASE,
            "https://smartstore.naver.com/dongsmarkett/products/1",
        )
        .unwrap_err();
        assert!(matches!(err, StorefrontError::InvalidName(_)));
    }

    #[test]
    fn from_input_accepts_bare_name_or_url() {
        assert_eq!(
            StorefrontName::from_input(BASE, "dongsmarkett").unwrap(),
            StorefrontName::from_input(BASE, "https://smartstore.naver.com/dongsmarkett").unwrap()
        );
    }
}
