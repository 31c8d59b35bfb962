//! Shared primitives for all Rust crates in authsift.

#![forbid(unsafe_code)]

/// Identity primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across authsift crates.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AuthzResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AuthzError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Terminal error categories surfaced by an authorization request.
///
/// None of these are retried or swallowed; a failed request never returns a
/// partial authorized subset.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Session establishment failed before impersonation was attempted.
    #[error("connection error: {0}")]
    Connection(String),

    /// Impersonation of the requested identity was rejected by the
    /// repository; no queries were issued.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// A batch membership query failed.
    #[error("query error: {0}")]
    Query(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::NonEmptyString;

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_value() {
        let result = NonEmptyString::new("jsmith");
        assert!(result.is_ok());
        assert_eq!(
            result.map(String::from).unwrap_or_default(),
            "jsmith"
        );
    }
}
