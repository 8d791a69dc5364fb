//! Client configuration
//!
//! Settings are layered: built-in defaults, then an optional `edublog.toml`
//! in the working directory, then `EDUBLOG_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SettingsError, SettingsResult};

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the blog client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the posts REST API
    pub api_url: String,
    /// Number of posts requested per page
    pub page_size: u32,
    /// Optional per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Where the signed-in session is persisted
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new ClientConfig from defaults, `edublog.toml` and the environment
    ///
    /// # Environment Variables
    /// - `EDUBLOG_API_URL`: Base URL of the API (default: "http://localhost:3000")
    /// - `EDUBLOG_PAGE_SIZE`: Posts per page (default: 10)
    /// - `EDUBLOG_REQUEST_TIMEOUT_SECS`: Request timeout in seconds (default: none)
    /// - `EDUBLOG_SESSION_FILE`: Session file path (default: under the user config dir)
    pub fn from_env() -> SettingsResult<Self> {
        let settings = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .add_source(File::with_name("edublog").required(false))
            .add_source(Environment::with_prefix("EDUBLOG").try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SettingsResult<()> {
        if self.page_size == 0 {
            return Err(SettingsError::Invalid {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.api_url.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "api_url",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Resolved location of the session file
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("edublog")
                .join("session.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 4] = [
        "EDUBLOG_API_URL",
        "EDUBLOG_PAGE_SIZE",
        "EDUBLOG_REQUEST_TIMEOUT_SECS",
        "EDUBLOG_SESSION_FILE",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_client_config_defaults() {
        clear_env();

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout(), None);
        assert!(config.session_path().ends_with("edublog/session.json"));
    }

    #[test]
    #[serial]
    fn test_client_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("EDUBLOG_API_URL", "http://blog.test:8080");
            std::env::set_var("EDUBLOG_PAGE_SIZE", "25");
            std::env::set_var("EDUBLOG_REQUEST_TIMEOUT_SECS", "5");
            std::env::set_var("EDUBLOG_SESSION_FILE", "/tmp/edublog-session.json");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://blog.test:8080");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.session_path(),
            PathBuf::from("/tmp/edublog-session.json")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_client_config_rejects_zero_page_size() {
        clear_env();
        unsafe {
            std::env::set_var("EDUBLOG_PAGE_SIZE", "0");
        }

        let result = ClientConfig::from_env();
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                key: "page_size",
                ..
            })
        ));

        clear_env();
    }
}
