//! Process-level configuration loaded from the environment

use serde::{Deserialize, Serialize};

/// Environment variable toggling debug logging
pub const DEBUG_VAR: &str = "DEBUG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Verbose logging requested via `DEBUG=true`
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "startup-validator".to_string(),
            environment: "development".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Load a `.env` file if present, then read the process environment
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
        }

        let defaults = Self::default();
        Self {
            app_name: defaults.app_name,
            environment: std::env::var("APP_ENV").unwrap_or(defaults.environment),
            debug: std::env::var(DEBUG_VAR).is_ok_and(|v| parse_flag(&v)),
        }
    }

    /// Default log filter for this configuration
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// Interpret a boolean-ish environment value
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
