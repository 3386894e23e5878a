//! Configuration system for Rockfish.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $ROCKFISH_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/rockfish/config.toml
//!   3. ~/.config/rockfish/config.toml

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How often the activity log starts a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogPolicy {
    /// Logging is disabled.
    #[default]
    Disabled,
    /// Rotate the log file daily.
    Daily,
    /// Rotate the log file weekly.
    Weekly,
    /// Rotate the log file monthly.
    Monthly,
}

impl FromStr for LogPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(LogPolicy::Disabled),
            "daily" => Ok(LogPolicy::Daily),
            "weekly" => Ok(LogPolicy::Weekly),
            "monthly" => Ok(LogPolicy::Monthly),
            other => Err(format!("unknown log policy: {other}")),
        }
    }
}

impl fmt::Display for LogPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogPolicy::Disabled => "disabled",
            LogPolicy::Daily => "daily",
            LogPolicy::Weekly => "weekly",
            LogPolicy::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RockfishConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or IP address of the target server.
    pub host: String,
    /// Service binding port.
    pub port: u16,
    /// Name the server reports in Echo replies.
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Id that allows log entries to be aggregated by user.
    pub client_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub policy: LogPolicy,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: crate::wire::SERVICE_PORT,
            display_name: env_hostname(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let user = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
        Self {
            client_id: format!("{}@{}", user, env_hostname()),
        }
    }
}

fn env_hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

// ── Path helpers ──────────────────────────────────────────────────────────────

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("rockfish")
}

pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".local").join("share"))
        .join("rockfish")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RockfishConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            RockfishConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("ROCKFISH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&RockfishConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Persist the current values back to the config file.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        let text = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        Ok(path)
    }

    /// Apply ROCKFISH_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ROCKFISH_SERVER__HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("ROCKFISH_SERVER__PORT") {
            if let Ok(p) = v.parse() {
                self.server.port = p;
            }
        }
        if let Ok(v) = std::env::var("ROCKFISH_SERVER__DISPLAY_NAME") {
            self.server.display_name = v;
        }
        if let Ok(v) = std::env::var("ROCKFISH_CLIENT__CLIENT_ID") {
            self.client.client_id = v;
        }
        if let Ok(v) = std::env::var("ROCKFISH_LOG__POLICY") {
            if let Ok(p) = v.parse() {
                self.log.policy = p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = RockfishConfig::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.log.policy, LogPolicy::Disabled);
        assert!(config.client.client_id.contains('@'));
    }

    #[test]
    fn log_policy_parses_case_insensitively() {
        assert_eq!("daily".parse::<LogPolicy>().unwrap(), LogPolicy::Daily);
        assert_eq!("Weekly".parse::<LogPolicy>().unwrap(), LogPolicy::Weekly);
        assert_eq!("MONTHLY".parse::<LogPolicy>().unwrap(), LogPolicy::Monthly);
        assert_eq!(
            "disabled".parse::<LogPolicy>().unwrap(),
            LogPolicy::Disabled
        );
        assert!("hourly".parse::<LogPolicy>().is_err());
    }

    #[test]
    fn log_policy_display_round_trips() {
        for policy in [
            LogPolicy::Disabled,
            LogPolicy::Daily,
            LogPolicy::Weekly,
            LogPolicy::Monthly,
        ] {
            assert_eq!(policy.to_string().parse::<LogPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = RockfishConfig::default();
        config.server.host = "geometry.local".to_string();
        config.log.policy = LogPolicy::Weekly;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: RockfishConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.server.host, "geometry.local");
        assert_eq!(back.log.policy, LogPolicy::Weekly);
    }
}
