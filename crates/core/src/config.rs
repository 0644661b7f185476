//! Application configuration

use crate::countdown::EXTEND_SECONDS;
use crate::starfield::STAR_COUNT;
use serde::{Deserialize, Serialize};

/// Base URL used when no override is compiled in
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Runtime settings for the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the remote authentication API, without trailing slash
    pub api_base_url: String,
    /// Number of streaks in the background animation
    pub star_count: usize,
    /// Seconds granted by the "Extend Session" action
    pub extend_seconds: u64,
    /// Countdown tick period in milliseconds
    pub tick_interval_ms: u32,
    /// How long a notice stays on screen in milliseconds
    pub notice_timeout_ms: u32,
}

impl AppConfig {
    /// Storage key holding the serialized user profile
    pub const USER_KEY: &'static str = "user";

    /// Storage key holding the serialized access token
    pub const ACCESS_KEY: &'static str = "access";

    /// Build the configuration, honouring a `SECURE_AUTH_API_URL` value
    /// captured at compile time. The browser has no process environment, so
    /// the override is baked into the bundle.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = option_env!("SECURE_AUTH_API_URL") {
            config = config.with_api_base_url(url);
        }
        config
    }

    /// Replace the API base URL, dropping any trailing slash
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            star_count: STAR_COUNT,
            extend_seconds: EXTEND_SECONDS,
            tick_interval_ms: 1000,
            notice_timeout_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_backend() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.star_count, 400);
        assert_eq!(config.extend_seconds, 300);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn base_url_is_normalised() {
        let config = AppConfig::default().with_api_base_url("https://auth.example.com///");
        assert_eq!(config.api_base_url, "https://auth.example.com");
    }
}
