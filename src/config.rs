use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::host::{ChatHostPattern, DEFAULT_CHAT_HOST_PATTERN};
use crate::tracker::TrackerSettings;

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "CHAT_TAB_WATCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay after the last title change before the settle check
    pub settle_window_ms: u64,
    /// Minimum quiet time the settle check requires
    pub quiet_threshold_ms: u64,
    /// Regex matched against tab URLs
    pub chat_host_pattern: String,
    /// Shown for tabs with an empty title
    pub placeholder_title: String,
    pub notification_title: String,
    pub notification_fallback_body: String,
    pub notification_icon: String,
    pub message_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        let settings = TrackerSettings::default();
        Self {
            settle_window_ms: settings.settle_window.as_millis() as u64,
            quiet_threshold_ms: settings.quiet_threshold.as_millis() as u64,
            chat_host_pattern: DEFAULT_CHAT_HOST_PATTERN.to_string(),
            placeholder_title: "(new chat)".to_string(),
            notification_title: settings.notification_title,
            notification_fallback_body: settings.fallback_body,
            notification_icon: settings.icon_url,
            message_max_chars: settings.message_max_chars,
        }
    }
}

impl Config {
    /// Load from `$CHAT_TAB_WATCH_CONFIG` or the user config directory.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chat-tab-watch").join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet_threshold_ms > self.settle_window_ms {
            return Err(ConfigError::QuietExceedsWindow {
                quiet_ms: self.quiet_threshold_ms,
                settle_ms: self.settle_window_ms,
            });
        }
        self.chat_host_pattern()?;
        Ok(())
    }

    pub fn chat_host_pattern(&self) -> Result<ChatHostPattern, ConfigError> {
        Ok(ChatHostPattern::new(&self.chat_host_pattern)?)
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            settle_window: Duration::from_millis(self.settle_window_ms),
            quiet_threshold: Duration::from_millis(self.quiet_threshold_ms),
            notification_title: self.notification_title.clone(),
            fallback_body: self.notification_fallback_body.clone(),
            icon_url: self.notification_icon.clone(),
            message_max_chars: self.message_max_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_observed_configuration() {
        let config = Config::default();
        assert_eq!(config.settle_window_ms, 2000);
        assert_eq!(config.quiet_threshold_ms, 1800);
        assert_eq!(config.message_max_chars, 120);
        assert_eq!(config.placeholder_title, "(new chat)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml("settle_window_ms = 3000\n").unwrap();
        assert_eq!(config.settle_window_ms, 3000);
        assert_eq!(config.quiet_threshold_ms, 1800);
        assert_eq!(config.tracker_settings().settle_window, Duration::from_secs(3));
    }

    #[test]
    fn test_quiet_threshold_above_window_rejected() {
        let err = Config::from_toml("settle_window_ms = 1000\nquiet_threshold_ms = 1500\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::QuietExceedsWindow { .. }));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Config::from_toml("chat_host_pattern = \"(oops\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Pattern(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            Config::from_toml("settle_window_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chat_host_pattern = 'claude\\.ai'").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!(config.chat_host_pattern().unwrap().is_match("https://claude.ai/"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
