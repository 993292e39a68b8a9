//! Configuration for validation runs

use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the Serper API key
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";
/// Environment variable overriding the execution budget, in seconds
pub const MAX_EXECUTION_VAR: &str = "VALIDATOR_MAX_EXECUTION_SECS";
/// Environment variable overriding the retry count
pub const MAX_RETRIES_VAR: &str = "VALIDATOR_MAX_RETRIES";
/// Environment variable toggling the search cache
pub const CACHE_ENABLED_VAR: &str = "VALIDATOR_CACHE_ENABLED";

const DEFAULT_SEARCH_ENDPOINT: &str = "https://google.serper.dev/search";

/// Configuration for validation runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Serper API key; without it every search degrades to fallback data
    pub serper_api_key: Option<String>,

    /// Search endpoint URL
    pub search_endpoint: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Retries after the first failed search attempt
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Search requests allowed per minute
    pub rate_limit_per_minute: u32,

    /// Whether identical searches are served from cache
    pub cache_enabled: bool,

    /// Cache TTL for search responses
    pub cache_ttl: Duration,

    /// Wall-clock budget for a whole validation run
    pub max_execution_time: Duration,

    /// Share of the market captured by year three of the revenue projection
    pub capture_rate: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff_base: Duration::from_millis(500),
            rate_limit_per_minute: 60,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(300), // 5 minutes
            max_execution_time: Duration::from_secs(60),
            capture_rate: 0.001,
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration builder
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Build a configuration from defaults overlaid with the environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Whether a search API key is available
    pub fn has_search_key(&self) -> bool {
        self.serper_api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries > 10 {
            return Err(ValidatorError::ConfigError(
                "max_retries must be at most 10".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(ValidatorError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.max_execution_time.is_zero() || self.request_timeout.is_zero() {
            return Err(ValidatorError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        if !(self.capture_rate > 0.0 && self.capture_rate <= 1.0) {
            return Err(ValidatorError::ConfigError(format!(
                "capture_rate must be in (0, 1], got {}",
                self.capture_rate
            )));
        }

        url::Url::parse(&self.search_endpoint).map_err(|e| {
            ValidatorError::ConfigError(format!("invalid search_endpoint: {e}"))
        })?;

        Ok(())
    }

    /// Get retry backoff duration for attempt number
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base * 2_u32.pow(attempt)
    }
}

/// Builder for ValidatorConfig
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    serper_api_key: Option<String>,
    search_endpoint: Option<String>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    cache_enabled: Option<bool>,
    cache_ttl: Option<Duration>,
    max_execution_time: Option<Duration>,
    capture_rate: Option<f64>,
    env_error: Option<String>,
}

impl ValidatorConfigBuilder {
    /// Set the Serper API key
    pub fn serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.serper_api_key = Some(key.into());
        self
    }

    /// Set the search endpoint
    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the search rate limit
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Enable or disable the search cache
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Set cache TTL for search responses
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set the execution budget for a validation run
    pub fn max_execution_time(mut self, duration: Duration) -> Self {
        self.max_execution_time = Some(duration);
        self
    }

    /// Set the revenue projection capture rate
    pub fn capture_rate(mut self, rate: f64) -> Self {
        self.capture_rate = Some(rate);
        self
    }

    /// Overlay values from the process environment
    ///
    /// Unparsable numeric values surface as a configuration error on `build`.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(SERPER_API_KEY_VAR) {
            if !key.trim().is_empty() {
                self.serper_api_key = Some(key);
            }
        }

        if let Ok(secs) = std::env::var(MAX_EXECUTION_VAR) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.max_execution_time = Some(Duration::from_secs(secs)),
                Err(e) => self.env_error = Some(format!("{MAX_EXECUTION_VAR}: {e}")),
            }
        }

        if let Ok(retries) = std::env::var(MAX_RETRIES_VAR) {
            match retries.trim().parse::<u32>() {
                Ok(retries) => self.max_retries = Some(retries),
                Err(e) => self.env_error = Some(format!("{MAX_RETRIES_VAR}: {e}")),
            }
        }

        if let Ok(flag) = std::env::var(CACHE_ENABLED_VAR) {
            self.cache_enabled = Some(validator_utils::config::parse_flag(&flag));
        }

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValidatorConfig> {
        if let Some(err) = self.env_error {
            return Err(ValidatorError::ConfigError(err));
        }

        let defaults = ValidatorConfig::default();

        let config = ValidatorConfig {
            serper_api_key: self.serper_api_key,
            search_endpoint: self.search_endpoint.unwrap_or(defaults.search_endpoint),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            cache_enabled: self.cache_enabled.unwrap_or(defaults.cache_enabled),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            max_execution_time: self.max_execution_time.unwrap_or(defaults.max_execution_time),
            capture_rate: self.capture_rate.unwrap_or(defaults.capture_rate),
        };

        config.validate()?;
        Ok(config)
    }
}
