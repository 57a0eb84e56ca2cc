#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_base_url, validate_range, validate_session_path, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8018";
pub const DEFAULT_SESSION_PATH: &str = ".bablo/session.json";

/// Resolved client settings: defaults, then the config file, then flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub session_path: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_path: DEFAULT_SESSION_PATH.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ClientSettings {
    pub fn merge_toml(mut self, config: &TomlConfig) -> Self {
        if let Some(base_url) = config.base_url() {
            self.base_url = base_url.to_string();
        }
        if let Some(path) = config.session_path() {
            self.session_path = path.to_string();
        }
        if let Some(timeout) = config.timeout_seconds() {
            self.timeout_seconds = Some(timeout);
        }
        self
    }

    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        session_path: Option<&str>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url.to_string();
        }
        if let Some(path) = session_path {
            self.session_path = path.to_string();
        }
        if timeout_seconds.is_some() {
            self.timeout_seconds = timeout_seconds;
        }
        self
    }
}

impl ConfigProvider for ClientSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_path(&self) -> &str {
        &self.session_path
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_base_url("base_url", &self.base_url)?;
        validate_session_path("session_path", &self.session_path)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 600)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_server() {
        let settings = ClientSettings::default();

        assert_eq!(settings.base_url(), "http://localhost:8018");
        assert_eq!(settings.request_timeout(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[server]
base_url = "http://from-file:8018"
timeout_seconds = 10

[session]
path = "file-session.json"
"#,
        )
        .unwrap();

        let settings = ClientSettings::default()
            .merge_toml(&file)
            .with_overrides(Some("http://from-flag:9000"), None, None);

        assert_eq!(settings.base_url, "http://from-flag:9000");
        assert_eq!(settings.session_path, "file-session.json");
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let settings = ClientSettings::default().with_overrides(Some("localhost"), None, Some(0));
        assert!(settings.validate().is_err());
    }
}
