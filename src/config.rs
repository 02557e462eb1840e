//! Configuration loading for the scrape gateway
//!
//! Settings come from a `key=value` file read once at startup, with CLI flags
//! taking precedence. API keys live in a separate file, one key per line.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Main configuration for the gateway
///
/// Controls the browser pool size, cache bounds, the Chromium binary used for
/// rendering, and the listen port.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Number of browser tabs held in the pool (default: 8)
    pub pool_size: usize,

    /// Sliding time-to-live for cached pages (default: 600 seconds)
    ///
    /// Every cache hit pushes the entry's expiry out by this much again.
    pub cache_ttl: Duration,

    /// Maximum number of cached pages (default: 100)
    pub cache_max_size: usize,

    /// Path to the Chromium executable (default: /usr/bin/chromium)
    pub chromium_path: String,

    /// Port the HTTP server listens on (default: 8080)
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_size: 8,
            cache_ttl: Duration::from_secs(600),
            cache_max_size: 100,
            chromium_path: "/usr/bin/chromium".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Parse configuration from `key=value` lines.
    ///
    /// Blank lines and `#` comments are skipped; unknown keys are ignored so
    /// old config files keep working. A malformed value for a known key is an
    /// error rather than a silent fallback.
    pub fn from_lines(content: &str) -> Result<Self, GatewayError> {
        let mut config = Config::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "pool_size" => {
                    config.pool_size = value
                        .parse()
                        .map_err(|_| GatewayError::Config(format!("invalid pool_size: {value}")))?;
                }
                "cache_ttl" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| GatewayError::Config(format!("invalid cache_ttl: {value}")))?;
                    config.cache_ttl = Duration::from_secs(secs);
                }
                "cache_max_size" => {
                    config.cache_max_size = value.parse().map_err(|_| {
                        GatewayError::Config(format!("invalid cache_max_size: {value}"))
                    })?;
                }
                "chromium_path" => {
                    config.chromium_path = value.to_string();
                }
                "port" => {
                    config.port = value
                        .parse()
                        .map_err(|_| GatewayError::Config(format!("invalid port: {value}")))?;
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Load configuration from a file path.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_lines(&content)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.pool_size == 0 {
            return Err(GatewayError::Config(
                "pool_size must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl.as_secs() == 0 {
            return Err(GatewayError::Config(
                "cache_ttl must be greater than 0".to_string(),
            ));
        }

        if self.cache_max_size == 0 {
            return Err(GatewayError::Config(
                "cache_max_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// API-key allow-list loaded at startup
///
/// Membership test only; keys are opaque strings compared exactly.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashSet<String>,
}

impl ApiKeys {
    /// Parse keys from file content, one key per line.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn from_lines(content: &str) -> Self {
        let keys = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self { keys }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_lines(&content))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.cache_max_size, 100);
        assert_eq!(config.chromium_path, "/usr/bin/chromium");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_from_lines() {
        let content = "\
# gateway settings
pool_size = 4
cache_ttl=120

cache_max_size = 10
chromium_path = /opt/chromium/chrome
port = 9090
";
        let config = Config::from_lines(content).unwrap();
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.cache_max_size, 10);
        assert_eq!(config.chromium_path, "/opt/chromium/chrome");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_config_unknown_keys_ignored() {
        let config = Config::from_lines("future_option = yes\npool_size = 2\n").unwrap();
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_invalid_value() {
        assert!(Config::from_lines("pool_size = many").is_err());
        assert!(Config::from_lines("port = 99999").is_err());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_keys_from_lines() {
        let keys = ApiKeys::from_lines("alpha\n# comment\n\n  beta  \n");
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("alpha"));
        assert!(keys.contains("beta"));
        assert!(!keys.contains("# comment"));
        assert!(!keys.contains("gamma"));
    }

    #[test]
    fn test_api_keys_empty() {
        let keys = ApiKeys::from_lines("\n# only comments\n");
        assert!(keys.is_empty());
    }
}
