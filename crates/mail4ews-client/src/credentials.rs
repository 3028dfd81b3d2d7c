//! Basic username/password credentials.

use std::fmt;

/// Username/password credentials sent as HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct WebCredentials {
    username: String,
    password: String,
    domain: Option<String>,
}

impl WebCredentials {
    /// Creates credentials for the given user.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            domain: None,
        }
    }

    /// Sets the Windows domain; the user is then sent as `DOMAIN\user`.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Returns the username as given.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the domain, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Login name put on the wire.
    #[must_use]
    pub fn login(&self) -> String {
        self.domain.as_ref().map_or_else(
            || self.username.clone(),
            |domain| format!("{domain}\\{}", self.username),
        )
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for WebCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_without_domain() {
        let credentials = WebCredentials::new("alice", "secret");
        assert_eq!(credentials.login(), "alice");
        assert_eq!(credentials.domain(), None);
    }

    #[test]
    fn test_login_with_domain() {
        let credentials = WebCredentials::new("alice", "secret").with_domain("CORP");
        assert_eq!(credentials.login(), "CORP\\alice");
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = WebCredentials::new("alice", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
