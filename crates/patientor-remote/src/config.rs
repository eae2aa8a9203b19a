//! Transport configuration.
//!
//! Resolved once at startup and passed into [`ReqwestTransport`](crate::ReqwestTransport);
//! nothing reads the environment after that.

use serde::{Deserialize, Serialize};

use crate::{RemoteError, RemoteResult};

/// Base URL of a locally running API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE_URL: &str = "PATIENTOR_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PATIENTOR_REQUEST_TIMEOUT_SECS";

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    api_base_url: String,
    request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Validate and build a config. A trailing `/` on the base URL is dropped.
    pub fn new(api_base_url: impl Into<String>, request_timeout_secs: u64) -> RemoteResult<Self> {
        let api_base_url = api_base_url.into().trim().trim_end_matches('/').to_string();

        if api_base_url.is_empty() {
            return Err(RemoteError::InvalidConfig(
                "api_base_url cannot be empty".into(),
            ));
        }
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(RemoteError::InvalidConfig(format!(
                "api_base_url must be an http(s) URL: {}",
                api_base_url
            )));
        }
        if request_timeout_secs == 0 {
            return Err(RemoteError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout_secs,
        })
    }

    /// Read `PATIENTOR_API_BASE_URL` and `PATIENTOR_REQUEST_TIMEOUT_SECS`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> RemoteResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RemoteResult<Self> {
        let api_base_url =
            lookup(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let request_timeout_secs = match lookup(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                RemoteError::InvalidConfig(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_REQUEST_TIMEOUT_SECS, raw
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self::new(api_base_url, request_timeout_secs)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    /// Absolute URL for an API path such as `/patients`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RemoteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RemoteConfig::default());
        assert_eq!(config.url("/ping"), "http://localhost:3001/api/ping");
    }

    #[test]
    fn test_env_overrides() {
        let config = RemoteConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "https://records.example.org/api/"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url(), "https://records.example.org/api");
        assert_eq!(config.request_timeout_secs(), 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(RemoteConfig::new("", 5).is_err());
        assert!(RemoteConfig::new("ftp://host", 5).is_err());
        assert!(RemoteConfig::new("http://host", 0).is_err());
        assert!(RemoteConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")])).is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: RemoteConfig =
            serde_json::from_str(r#"{"api_base_url": "http://10.0.0.2:3001/api"}"#).unwrap();
        assert_eq!(config.api_base_url(), "http://10.0.0.2:3001/api");
        assert_eq!(config.request_timeout_secs(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    proptest! {
        #[test]
        fn url_joins_with_single_slash(
            base_slashes in 0usize..3,
            path_slashes in 0usize..3,
            segment in "[a-z0-9]{1,12}",
        ) {
            let base = format!("http://host/api{}", "/".repeat(base_slashes));
            let config = RemoteConfig::new(base, 10).unwrap();
            let path = format!("{}{}", "/".repeat(path_slashes), segment);

            prop_assert_eq!(config.url(&path), format!("http://host/api/{}", segment));
        }
    }
}
