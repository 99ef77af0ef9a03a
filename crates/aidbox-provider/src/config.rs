//! # Provider Configuration
//!
//! Connection settings read from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `AIDBOX_URL` | base URL | required |
//! | `AIDBOX_CLIENT_ID` | client id | required |
//! | `AIDBOX_CLIENT_SECRET` | client secret | required |
//! | `AIDBOX_AUTH_MODE` | `token` or `basic` | `token` |
//! | `AIDBOX_TIMEOUT_SECS` | request timeout in seconds | `30` |
//!
//! [`ProviderConfig::from_lookup`] takes the variable source as a function, so command-line
//! overrides and tests feed values through the same path as the process environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const URL_VAR: &str = "AIDBOX_URL";
pub const CLIENT_ID_VAR: &str = "AIDBOX_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AIDBOX_CLIENT_SECRET";
pub const AUTH_MODE_VAR: &str = "AIDBOX_AUTH_MODE";
pub const TIMEOUT_VAR: &str = "AIDBOX_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),

    #[error("AIDBOX_AUTH_MODE must be 'token' or 'basic', got '{0}'")]
    InvalidAuthMode(String),

    #[error("AIDBOX_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

/// How requests to the store are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Exchange the client credentials for a bearer token once, at connect time.
    #[default]
    Token,
    /// Send the client credentials as HTTP basic auth on every request.
    Basic,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(AuthMode::Token),
            "basic" => Ok(AuthMode::Basic),
            _ => Err(ConfigError::InvalidAuthMode(s.to_string())),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Token => f.write_str("token"),
            AuthMode::Basic => f.write_str("basic"),
        }
    }
}

/// Connection settings for an Aidbox instance.
///
/// The [`Debug`] impl redacts the client secret.
#[derive(Clone)]
pub struct ProviderConfig {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    pub auth_mode: AuthMode,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Creates a config with token auth and the default timeout.
    pub fn new(
        url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_mode: AuthMode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let auth_mode = match optional(AUTH_MODE_VAR) {
            Some(raw) => raw.parse()?,
            None => AuthMode::default(),
        };
        let timeout = match optional(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            url: required(URL_VAR)?,
            client_id: required(CLIENT_ID_VAR)?,
            client_secret: required(CLIENT_SECRET_VAR)?,
            auth_mode,
            timeout,
        })
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_mode", &self.auth_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (URL_VAR, "http://localhost:8888"),
            (CLIENT_ID_VAR, "root"),
            (CLIENT_SECRET_VAR, "secret"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::from_lookup(lookup_from(&complete())).unwrap();
        assert_eq!(config.url, "http://localhost:8888");
        assert_eq!(config.client_id, "root");
        assert_eq!(config.auth_mode, AuthMode::Token);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_optional_settings() {
        let mut vars = complete();
        vars.push((AUTH_MODE_VAR, "Basic"));
        vars.push((TIMEOUT_VAR, "5"));
        let config = ProviderConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.auth_mode, AuthMode::Basic);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_or_blank_required_values() {
        let err = ProviderConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(URL_VAR));

        let mut vars = complete();
        vars[2] = (CLIENT_SECRET_VAR, "  ");
        let err = ProviderConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(CLIENT_SECRET_VAR));
    }

    #[test]
    fn test_invalid_values() {
        for timeout in ["0", "-1", "soon"] {
            let mut vars = complete();
            vars.push((TIMEOUT_VAR, timeout));
            assert!(matches!(
                ProviderConfig::from_lookup(lookup_from(&vars)),
                Err(ConfigError::InvalidTimeout(_))
            ));
        }

        let mut vars = complete();
        vars.push((AUTH_MODE_VAR, "kerberos"));
        assert_eq!(
            ProviderConfig::from_lookup(lookup_from(&vars)).unwrap_err(),
            ConfigError::InvalidAuthMode("kerberos".to_string())
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ProviderConfig::new("http://aidbox", "root", "hunter2");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("root"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }
}
