use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared fields of an Aidbox `User`.
///
/// `name` is optional at the type level so a missing block surfaces as a validation error
/// rather than a decoding error.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    /// Plaintext password. The store only ever returns it hashed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub given_name: String,
    pub family_name: String,
}

impl UserSpec {
    /// Creates a user spec with the given names and no password.
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            name: Some(UserName {
                given_name: given_name.into(),
                family_name: family_name.into(),
            }),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSpec")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let spec = UserSpec::new("Ada", "Lovelace").with_password("p@ss");
        let rendered = format!("{spec:?}");
        assert!(rendered.contains("Ada"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("p@ss"));
    }
}
