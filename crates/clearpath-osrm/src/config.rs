//! Provider configuration from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "foot";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout: Duration,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl OsrmConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("CLEARPATH_OSRM_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            profile: env::var("CLEARPATH_OSRM_PROFILE")
                .unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
            timeout: Duration::from_millis(
                env::var("CLEARPATH_ROUTE_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
        }
    }

    /// Point the client at a different server, keeping profile and timeout.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_public_foot_router() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, "https://router.project-osrm.org");
        assert_eq!(config.profile, "foot");
        assert_eq!(config.timeout_ms(), 10_000);
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let config = OsrmConfig::default().with_base_url("http://127.0.0.1:5000/");
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.profile, "foot");
    }
}
