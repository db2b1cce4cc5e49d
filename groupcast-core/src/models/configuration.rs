//! Configuration data structures

use crate::error::ConfigError;
use crate::models::UserId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the bot token. Never stored in the config file.
pub const BOT_TOKEN_ENV: &str = "GROUPCAST_BOT_TOKEN";

/// Logging level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Logging verbosity level
    pub log_level: LogLevel,
    /// The only identity allowed to drive the bot
    pub operator_id: Option<i64>,
    /// JSON file holding tracked destination ids
    pub registry_path: PathBuf,
    pub telegram: TelegramSettings,
    pub broadcast: BroadcastSettings,
    pub provisioning: ProvisioningSettings,
}

/// Bot API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub api_base: String,
    /// getUpdates long-poll timeout
    pub poll_timeout_seconds: u64,
}

/// Fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastSettings {
    /// Edit the progress message every N processed destinations
    pub progress_every: usize,
    /// Fixed pause between two deliveries
    pub delivery_interval_ms: u64,
    /// Parse mode for text and captions (empty = plain)
    pub parse_mode: String,
    /// Abandon an unfinished draft after this much inactivity
    pub session_timeout_seconds: u64,
}

/// Provisioning loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningSettings {
    pub group_count: u32,
    /// Helper identities (usernames) added and promoted in every group, in order
    pub helpers: Vec<String>,
    pub about: String,
    /// Title prefix; defaults to the current "<Month> <Year>"
    pub title_stem: Option<String>,
    pub helper_interval_seconds: u64,
    pub group_interval_seconds: u64,
    pub retry_interval_seconds: u64,
    /// Pause between invite and promotion
    pub settle_seconds: u64,
    /// Absent = retry a helper forever
    pub max_attempts: Option<u32>,
    pub jitter_ms: Option<u64>,
    pub gateway_url: String,
    pub admin_rank: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            operator_id: None,
            registry_path: PathBuf::from("groups.json"),
            telegram: TelegramSettings::default(),
            broadcast: BroadcastSettings::default(),
            provisioning: ProvisioningSettings::default(),
        }
    }
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_seconds: 30,
        }
    }
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            progress_every: 5,
            delivery_interval_ms: 0,
            parse_mode: "HTML".to_string(),
            session_timeout_seconds: 1800,
        }
    }
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            group_count: 50,
            helpers: Vec::new(),
            about: "Auto created private group".to_string(),
            title_stem: None,
            helper_interval_seconds: 1,
            group_interval_seconds: 10,
            retry_interval_seconds: 3,
            settle_seconds: 1,
            max_attempts: None,
            jitter_ms: None,
            gateway_url: "http://127.0.0.1:8088".to_string(),
            admin_rank: "Bot".to_string(),
        }
    }
}

impl BroadcastSettings {
    pub fn delivery_interval(&self) -> Duration {
        Duration::from_millis(self.delivery_interval_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_seconds)
    }

    pub fn parse_mode(&self) -> Option<&str> {
        if self.parse_mode.is_empty() {
            None
        } else {
            Some(&self.parse_mode)
        }
    }
}

impl Configuration {
    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Configuration = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("groupcast").join("config.toml"))
    }

    pub fn operator(&self) -> Option<UserId> {
        self.operator_id.map(UserId)
    }

    /// Validate settings needed by the bot service
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.operator_id.is_none() {
            errors.push("operator_id must be set".to_string());
        }

        if self.broadcast.progress_every == 0 {
            errors.push("broadcast.progress_every must be at least 1".to_string());
        }

        if self.broadcast.session_timeout_seconds == 0 {
            errors.push("broadcast.session_timeout_seconds must be at least 1".to_string());
        }

        if url::Url::parse(&self.telegram.api_base).is_err() {
            errors.push("telegram.api_base must be a valid URL".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate settings needed by the provisioning loop
    pub fn validate_provisioning(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let settings = &self.provisioning;

        if settings.helpers.is_empty() {
            errors.push("provisioning.helpers must list at least one helper".to_string());
        }

        if settings.helpers.iter().any(|h| h.trim().is_empty()) {
            errors.push("provisioning.helpers must not contain blank entries".to_string());
        }

        match url::Url::parse(&settings.gateway_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push("provisioning.gateway_url must be an http(s) URL".to_string()),
        }

        if settings.max_attempts == Some(0) {
            errors.push("provisioning.max_attempts must be at least 1 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.broadcast.progress_every, 5);
        assert_eq!(config.broadcast.session_timeout(), Duration::from_secs(1800));
        assert_eq!(config.provisioning.group_count, 50);
        assert_eq!(config.provisioning.retry_interval_seconds, 3);
        assert!(config.provisioning.max_attempts.is_none());
        assert_eq!(config.registry_path, PathBuf::from("groups.json"));
    }

    #[test]
    fn test_configuration_validation() {
        let config = Configuration {
            broadcast: BroadcastSettings {
                progress_every: 0,
                ..BroadcastSettings::default()
            },
            ..Configuration::default()
        };

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("operator_id")));
        assert!(errors.iter().any(|e| e.contains("progress_every")));
    }

    #[test]
    fn test_provisioning_validation() {
        let mut config = Configuration::default();
        config.provisioning.gateway_url = "ftp://gateway".to_string();
        config.provisioning.max_attempts = Some(0);

        let errors = config.validate_provisioning().unwrap_err();
        assert_eq!(errors.len(), 3);

        config.provisioning.helpers = vec!["@helper_bot".to_string()];
        config.provisioning.gateway_url = "http://localhost:8088".to_string();
        config.provisioning.max_attempts = None;
        assert!(config.validate_provisioning().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Configuration = toml::from_str(
            "operator_id = 42\n[provisioning]\nhelpers = [\"@a_bot\"]\ngroup_count = 3\n",
        )
        .unwrap();
        assert_eq!(config.operator(), Some(UserId(42)));
        assert_eq!(config.provisioning.group_count, 3);
        assert_eq!(config.provisioning.about, "Auto created private group");
        assert_eq!(config.telegram.poll_timeout_seconds, 30);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Configuration {
            operator_id: Some(7),
            registry_path: PathBuf::from("/var/lib/groupcast/groups.json"),
            ..Configuration::default()
        };

        config.save_to_file(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = Configuration::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.operator_id, Some(7));
        assert_eq!(loaded.registry_path, config.registry_path);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let temp_dir = tempdir().unwrap();
        let loaded = Configuration::load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert!(loaded.operator_id.is_none());
    }
}
