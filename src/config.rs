//! Configuration types for query-task-connector

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Remote query-distribution API settings
///
/// Supplied once at construction time and treated as immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote service (e.g. "https://rquest.example.org/link_connector_api")
    #[serde(default)]
    pub base_url: String,

    /// Fetch-query endpoint, relative to `base_url` (default: "task/nextjob")
    #[serde(default = "default_fetch_query_endpoint")]
    pub fetch_query_endpoint: String,

    /// Submit-result endpoint, relative to `base_url` (default: "task/result")
    ///
    /// Cancellations are posted here as well.
    #[serde(default = "default_submit_result_endpoint")]
    pub submit_result_endpoint: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            fetch_query_endpoint: default_fetch_query_endpoint(),
            submit_result_endpoint: default_submit_result_endpoint(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Settings for `base_url` with default endpoint paths
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Parse `base_url`, forcing a trailing slash so relative joins append to its path
    pub fn base(&self) -> Result<Url> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(Error::config("base URL must not be empty", "api.base_url"));
        }

        let mut base = Url::parse(trimmed)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::config(
                format!("unsupported URL scheme '{}'", base.scheme()),
                "api.base_url",
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    /// Full URL of the fetch-query endpoint
    pub fn fetch_query_url(&self) -> Result<Url> {
        self.endpoint_url(&self.fetch_query_endpoint, "api.fetch_query_endpoint")
    }

    /// Full URL of the submit-result endpoint
    pub fn submit_result_url(&self) -> Result<Url> {
        self.endpoint_url(&self.submit_result_endpoint, "api.submit_result_endpoint")
    }

    fn endpoint_url(&self, endpoint: &str, key: &str) -> Result<Url> {
        // A leading slash would replace the base path instead of extending it
        let relative = endpoint.trim().trim_start_matches('/');
        if relative.is_empty() {
            return Err(Error::config("endpoint path must not be empty", key));
        }
        Ok(self.base()?.join(relative)?)
    }
}

/// Polling settings for the collection this node serves
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Collection (biobank) identifier to fetch tasks for
    #[serde(default)]
    pub collection_id: String,

    /// Delay between fetch attempts (default: 5 seconds)
    #[serde(default = "default_query_polling_interval", with = "duration_serde")]
    pub query_polling_interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            collection_id: String::new(),
            query_polling_interval: default_query_polling_interval(),
        }
    }
}

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling settings
    #[serde(default)]
    pub polling: PollingConfig,
}

impl Config {
    /// Parse configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Check that the API URLs resolve and the polling interval is usable
    ///
    /// An empty collection id is accepted here; the poller rejects it when it starts.
    pub fn validate(&self) -> Result<()> {
        self.api.fetch_query_url()?;
        self.api.submit_result_url()?;

        if self.polling.query_polling_interval.is_zero() {
            return Err(Error::config(
                "polling interval must be at least one second",
                "polling.query_polling_interval",
            ));
        }
        Ok(())
    }
}

// Default value functions
fn default_fetch_query_endpoint() -> String {
    "task/nextjob".to_string()
}

fn default_submit_result_endpoint() -> String {
    "task/result".to_string()
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_query_polling_interval() -> Duration {
    Duration::from_secs(5)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
