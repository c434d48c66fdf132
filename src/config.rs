//! Configuration management for sailsource
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! ## Deployment API
//! - `APPIAN_URL`: Base URL of the environment (e.g. https://mysite.appiancloud.com)
//! - `APPIAN_API_KEY`: API key with deployment permissions
//! - `APPIAN_APP_UUID`: Default application UUID to export
//! - `APPIAN_LOCAL_ZIP`: Pre-exported package loaded at startup
//! - `APPIAN_APP_NAME`: Application name for the startup package - default: "app"
//!
//! ## Runtime
//! - `SAILSOURCE_CACHE_DIR`: Package cache directory - default: `~/.appian-sail-cache`
//! - `SAILSOURCE_REQUEST_TIMEOUT`: HTTP timeout in seconds - default: "300"
//! - `SAILSOURCE_POLL_INTERVAL`: Seconds between export status polls - default: "5"
//! - `SAILSOURCE_MAX_POLLS`: Export status polls before giving up - default: "60"
//! - `SAILSOURCE_CHECKLIST_URL`: Accessibility checklist page
//! - `SAILSOURCE_LOG_LEVEL`: Logging level - default: "info"

use crate::util::logging;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_APP_NAME: &str = "app";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_MAX_POLLS: u32 = 60;
const DEFAULT_CACHE_DIR_NAME: &str = ".appian-sail-cache";
pub const DEFAULT_CHECKLIST_URL: &str =
    "https://appian-design.github.io/aurora/accessibility/checklist/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Cannot determine cache directory: set SAILSOURCE_CACHE_DIR")]
    NoCacheDir,
}

/// Base URL and API key for the deployment API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentCredentials {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct SailConfig {
    pub appian_url: String,
    pub api_key: String,
    pub default_app_uuid: Option<String>,
    pub local_zip: Option<PathBuf>,
    pub app_name: String,
    pub cache_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
    pub checklist_url: String,
    pub log_level: String,
}

impl Default for SailConfig {
    fn default() -> Self {
        let appian_url = env::var("APPIAN_URL").unwrap_or_default();
        let api_key = env::var("APPIAN_API_KEY").unwrap_or_default();

        let default_app_uuid = non_empty_var("APPIAN_APP_UUID");
        let local_zip = non_empty_var("APPIAN_LOCAL_ZIP").map(PathBuf::from);
        let app_name =
            non_empty_var("APPIAN_APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let cache_dir = non_empty_var("SAILSOURCE_CACHE_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_CACHE_DIR_NAME)));

        let request_timeout_secs = env::var("SAILSOURCE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let poll_interval_secs = env::var("SAILSOURCE_POLL_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let max_polls = env::var("SAILSOURCE_MAX_POLLS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_POLLS);

        let checklist_url = non_empty_var("SAILSOURCE_CHECKLIST_URL")
            .unwrap_or_else(|| DEFAULT_CHECKLIST_URL.to_string());

        let log_level = env::var("SAILSOURCE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            appian_url,
            api_key,
            default_app_uuid,
            local_zip,
            app_name,
            cache_dir,
            request_timeout_secs,
            poll_interval_secs,
            max_polls,
            checklist_url,
            log_level,
        }
    }
}

impl SailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        if self.max_polls == 0 {
            return Err(ConfigError::ValidationFailed(
                "Export poll count must be at least 1".to_string(),
            ));
        }

        if logging::level_from_name(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: {}",
                self.log_level,
                logging::LEVEL_NAMES.join(", ")
            )));
        }

        Ok(())
    }

    /// URL and key for live exports, if both are configured.
    pub fn deployment_credentials(&self) -> Option<DeploymentCredentials> {
        if self.appian_url.trim().is_empty() || self.api_key.trim().is_empty() {
            return None;
        }
        Some(DeploymentCredentials {
            base_url: self.appian_url.trim().trim_end_matches('/').to_string(),
            api_key: self.api_key.clone(),
        })
    }

    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        self.cache_dir.clone().ok_or(ConfigError::NoCacheDir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl fmt::Display for SailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sailsource Configuration:")?;
        writeln!(
            f,
            "  Appian URL: {}",
            if self.appian_url.is_empty() {
                "(not set)"
            } else {
                &self.appian_url
            }
        )?;
        writeln!(
            f,
            "  API Key: {}",
            if self.api_key.is_empty() {
                "(not set)"
            } else {
                "********"
            }
        )?;
        if let Some(ref uuid) = self.default_app_uuid {
            writeln!(f, "  Default App UUID: {}", uuid)?;
        }
        if let Some(ref dir) = self.cache_dir {
            writeln!(f, "  Cache Dir: {}", dir.display())?;
        }
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(
            f,
            "  Export Polling: {} x {}s",
            self.max_polls, self.poll_interval_secs
        )?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn remove(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn config() -> SailConfig {
        SailConfig {
            appian_url: "https://example.appiancloud.com/".to_string(),
            api_key: "secret".to_string(),
            default_app_uuid: None,
            local_zip: None,
            app_name: "app".to_string(),
            cache_dir: Some(PathBuf::from("/tmp/cache")),
            request_timeout_secs: 300,
            poll_interval_secs: 5,
            max_polls: 60,
            checklist_url: DEFAULT_CHECKLIST_URL.to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::remove("APPIAN_URL"),
            EnvGuard::remove("APPIAN_API_KEY"),
            EnvGuard::remove("APPIAN_APP_NAME"),
            EnvGuard::remove("SAILSOURCE_REQUEST_TIMEOUT"),
            EnvGuard::remove("SAILSOURCE_MAX_POLLS"),
            EnvGuard::remove("SAILSOURCE_POLL_INTERVAL"),
            EnvGuard::remove("SAILSOURCE_LOG_LEVEL"),
        ];

        let config = SailConfig::default();

        assert_eq!(config.app_name, DEFAULT_APP_NAME);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.max_polls, DEFAULT_MAX_POLLS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.deployment_credentials().is_none());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("APPIAN_URL", "https://site.example.com"),
            EnvGuard::set("APPIAN_API_KEY", "key"),
            EnvGuard::set("APPIAN_APP_UUID", "_a-0001"),
            EnvGuard::set("APPIAN_APP_NAME", "Cases"),
            EnvGuard::set("SAILSOURCE_CACHE_DIR", "/var/cache/sail"),
            EnvGuard::set("SAILSOURCE_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("SAILSOURCE_MAX_POLLS", "3"),
            EnvGuard::set("SAILSOURCE_LOG_LEVEL", "DEBUG"),
        ];

        let config = SailConfig::default();

        assert_eq!(config.default_app_uuid.as_deref(), Some("_a-0001"));
        assert_eq!(config.app_name, "Cases");
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/sail")));
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_polls, 3);
        assert_eq!(config.log_level, "debug");
        assert!(config.deployment_credentials().is_some());
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());

        let mut zero_timeout = config();
        zero_timeout.request_timeout_secs = 0;
        assert!(zero_timeout.validate().is_err());

        let mut zero_polls = config();
        zero_polls.max_polls = 0;
        assert!(zero_polls.validate().is_err());

        let mut bad_level = config();
        bad_level.log_level = "loud".to_string();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_same_levels_as_logging() {
        for name in logging::LEVEL_NAMES {
            let mut level = config();
            level.log_level = name.to_uppercase();
            assert!(level.validate().is_ok(), "{} rejected", name);
            assert!(logging::level_from_name(name).is_some());
        }

        let mut warning = config();
        warning.log_level = "warning".to_string();
        assert!(warning.validate().is_err());
        assert!(logging::level_from_name("warning").is_none());
    }

    #[test]
    fn test_deployment_credentials_trim_trailing_slash() {
        let creds = config().deployment_credentials().unwrap();
        assert_eq!(creds.base_url, "https://example.appiancloud.com");
        assert_eq!(creds.api_key, "secret");

        let mut missing_key = config();
        missing_key.api_key = "  ".to_string();
        assert!(missing_key.deployment_credentials().is_none());
    }

    #[test]
    fn test_cache_dir_required() {
        let mut no_cache = config();
        no_cache.cache_dir = None;
        assert!(matches!(no_cache.cache_dir(), Err(ConfigError::NoCacheDir)));
    }

    #[test]
    fn test_config_display_masks_key() {
        let display = format!("{}", config());
        assert!(display.contains("Sailsource Configuration:"));
        assert!(display.contains("********"));
        assert!(!display.contains("secret"));
    }
}
