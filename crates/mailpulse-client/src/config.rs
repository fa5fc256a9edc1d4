//! Connection settings for the gateway.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_API_URL: &str = "MAILPULSE_API_URL";
const ENV_TIMEOUT: &str = "MAILPULSE_HTTP_TIMEOUT_SECS";

/// Errors raised while reading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL could not be parsed.
    #[error("invalid API URL '{value}'")]
    InvalidUrl {
        /// Offending value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// Base URL used something other than http(s).
    #[error("API URL '{value}' must use http or https")]
    UnsupportedScheme {
        /// Offending value.
        value: String,
    },
    /// Timeout was not a positive integer number of seconds.
    #[error("invalid HTTP timeout '{value}'; expected a positive number of seconds")]
    InvalidTimeout {
        /// Offending value.
        value: String,
    },
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; request paths are appended verbatim.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration from an explicit base URL and timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL does not parse, is not http(s), or the
    /// timeout is zero.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: timeout_secs.to_string(),
            });
        }
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Read `MAILPULSE_API_URL` and `MAILPULSE_HTTP_TIMEOUT_SECS`, falling back
    /// to the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a caller-supplied variable source.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = match lookup(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Self::new(&base_url, timeout)
    }
}

/// Parse and validate a backend base URL.
///
/// # Errors
///
/// Returns an error when the value is not an absolute http(s) URL.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            value: value.to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://api.example.com/backend"),
            (ENV_TIMEOUT, " 30 "),
        ]))
        .expect("valid overrides");
        assert_eq!(config.base_url.as_str(), "https://api.example.com/backend");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            ClientConfig::new("localhost:8000", 10),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            ClientConfig::new("not a url", 10),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new(DEFAULT_API_URL, 0),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }
}
