//! Connection settings for a [`BoTTubeClient`](crate::BoTTubeClient).

use crate::error::Error;
use std::fmt;
use std::time::Duration;

/// Production API address.
pub const DEFAULT_BASE_URL: &str = "https://bottube.ai";

/// How long a single call may take before it is aborted.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const ENV_BASE_URL: &str = "BOTTUBE_BASE_URL";
const ENV_API_KEY: &str = "BOTTUBE_API_KEY";
const ENV_TIMEOUT_SECS: &str = "BOTTUBE_TIMEOUT_SECS";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Address the API paths are appended to. Trailing slashes are ignored.
    pub base_url: String,
    /// Credential sent as `X-API-Key` on authenticated calls.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Keep the API key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Reads `BOTTUBE_BASE_URL`, `BOTTUBE_API_KEY` and `BOTTUBE_TIMEOUT_SECS`.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = var(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.api_key = var(ENV_API_KEY);
        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            let secs: f64 = secs.parse().map_err(|_| {
                Error::Configuration(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}"))
            })?;
            config.timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::Configuration(format!("{ENV_TIMEOUT_SECS} is out of range: {secs}"))
            })?;
        }
        Ok(config)
    }

    /// The base URL without trailing slashes.
    pub(crate) fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
