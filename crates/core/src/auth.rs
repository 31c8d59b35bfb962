use crate::{AuthzError, AuthzResult, NonEmptyString};

/// End-user principal on whose behalf document authorization is checked.
///
/// The identity is supplied per request by the host search system and never
/// persisted; the repository session impersonates it before any query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    username: NonEmptyString,
    domain: Option<NonEmptyString>,
}

impl UserIdentity {
    /// Creates an identity from a username and an optional directory domain.
    pub fn new(username: impl Into<String>, domain: Option<String>) -> AuthzResult<Self> {
        let username = NonEmptyString::new(username)
            .map_err(|_| AuthzError::Validation("username must not be blank".to_owned()))?;
        let domain = domain
            .map(|value| {
                NonEmptyString::new(value)
                    .map_err(|_| AuthzError::Validation("domain must not be blank".to_owned()))
            })
            .transpose()?;

        Ok(Self { username, domain })
    }

    /// Returns the username to impersonate.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the directory domain, if the caller supplied one.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_ref().map(NonEmptyString::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::UserIdentity;

    #[test]
    fn identity_rejects_blank_username() {
        let identity = UserIdentity::new("  ", None);
        assert!(identity.is_err());
    }

    #[test]
    fn identity_rejects_blank_domain() {
        let identity = UserIdentity::new("jsmith", Some(String::new()));
        assert!(identity.is_err());
    }

    #[test]
    fn identity_keeps_optional_domain() {
        let identity = UserIdentity::new("jsmith", Some("corp".to_owned()));
        assert!(identity.is_ok());

        let identity = identity.unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.username(), "jsmith");
        assert_eq!(identity.domain(), Some("corp"));
    }
}
