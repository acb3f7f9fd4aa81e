//! Configuration for talking to the hosted graph.
//!
//! Everything is read from the environment (a `.env` file is loaded by the
//! binaries before this runs).

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{ZepError, ZepResult};

/// Default API endpoint of the hosted service.
pub const DEFAULT_BASE_URL: &str = "https://api.getzep.com/api/v2";

/// User targeted when neither a flag nor `ZEP_USER_ID` names one.
pub const DEFAULT_USER_ID: &str = "default";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote client.
#[derive(Debug)]
pub struct ClientConfig {
    /// API credential, never logged.
    pub api_key: SecretString,
    /// Base URL all endpoint paths are appended to.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> ZepResult<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a config with an optional endpoint and timeout override.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> ZepResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ZepError::configuration("ZEP_API_KEY required"));
        }

        let raw = base_url.unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ZepError::configuration(format!("invalid base URL '{}': {}", raw, e)))?;

        Ok(Self {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Create a config from environment variables.
    ///
    /// - `ZEP_API_KEY` (required)
    /// - `ZEP_BASE_URL` (optional)
    /// - `ZEP_TIMEOUT_SECS` (optional)
    pub fn from_env() -> ZepResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ZepResult<Self> {
        let api_key = lookup("ZEP_API_KEY").ok_or_else(|| ZepError::configuration("ZEP_API_KEY required"))?;
        let base_url = lookup("ZEP_BASE_URL");
        let timeout_secs = match lookup("ZEP_TIMEOUT_SECS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                ZepError::configuration(format!("ZEP_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?),
            None => None,
        };

        Self::with_options(api_key, base_url.as_deref(), timeout_secs)
    }
}

/// Target user: explicit value, else `ZEP_USER_ID`, else `"default"`.
///
/// Empty values count as unset.
pub fn resolve_user_id(explicit: Option<&str>) -> String {
    pick_user_id(explicit, std::env::var("ZEP_USER_ID").ok())
}

fn pick_user_id(explicit: Option<&str>, from_env: Option<String>) -> String {
    explicit
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or(from_env.filter(|id| !id.is_empty()))
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    #[test]
    fn test_default_endpoint() {
        let config = ClientConfig::new("key").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.getzep.com/api/v2");
        assert_eq!(config.api_key.expose_secret(), "key");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let config =
            ClientConfig::with_options("key", Some("http://localhost:8000/api/v2/"), Some(5)).unwrap();
        assert_eq!(config.base_url.path(), "/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = ClientConfig::new("  ").unwrap_err();
        assert!(err.to_string().contains("ZEP_API_KEY"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        tokio_test::assert_err!(ClientConfig::with_options("key", Some("not a url"), None));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("super-secret").unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name: &str| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let err = ClientConfig::from_lookup(vars(&[("ZEP_BASE_URL", "http://localhost:8000")])).unwrap_err();
        assert!(matches!(err, ZepError::Configuration(_)));
        assert!(err.to_string().contains("ZEP_API_KEY required"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = ClientConfig::from_lookup(vars(&[
            ("ZEP_API_KEY", "key"),
            ("ZEP_BASE_URL", "http://127.0.0.1:9000/api/v2"),
            ("ZEP_TIMEOUT_SECS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let err = ClientConfig::from_lookup(vars(&[("ZEP_API_KEY", "key"), ("ZEP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("ZEP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_user_id_precedence() {
        assert_eq!(pick_user_id(Some("alice"), Some("bob".to_string())), "alice");
        assert_eq!(pick_user_id(None, Some("bob".to_string())), "bob");
        assert_eq!(pick_user_id(Some(""), Some("bob".to_string())), "bob");
        assert_eq!(pick_user_id(None, Some(String::new())), "default");
        assert_eq!(pick_user_id(None, None), "default");
    }
}
