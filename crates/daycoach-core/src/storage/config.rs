//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default planning budget
//! - Working-window bounds and block granularity
//! - AI provider selection and credentials
//!
//! Configuration is stored at `~/.config/daycoach/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Planning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Minutes budget used when no calendar feed is consulted.
    #[serde(default = "default_minutes_available")]
    pub minutes_available: i64,
}

/// Calendar/work-window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_work_start")]
    pub work_start: String,
    #[serde(default = "default_work_end")]
    pub work_end: String,
    #[serde(default = "default_min_block")]
    pub min_block: i64,
    /// ICS feed URL; the integrations table takes precedence when set.
    #[serde(default)]
    pub feed_url: Option<String>,
}

/// AI generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key; the OPENAI_API_KEY environment variable takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AiConfig {
    /// The key to use for live generation, if any.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daycoach/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

// Default functions
fn default_minutes_available() -> i64 {
    90
}
fn default_work_start() -> String {
    "09:00".into()
}
fn default_work_end() -> String {
    "18:00".into()
}
fn default_min_block() -> i64 {
    15
}
fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            minutes_available: default_minutes_available(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            work_end: default_work_end(),
            min_block: default_min_block(),
            feed_url: None,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: None,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.plan.minutes_available, 90);
        assert_eq!(config.calendar.work_start, "09:00");
        assert_eq!(config.calendar.work_end, "18:00");
        assert_eq!(config.calendar.min_block, 15);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.model, "gpt-4o-mini");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            "[calendar]\nwork_end = \"17:00\"\n\n[ai]\nenabled = true\n",
        )
        .unwrap();
        assert_eq!(config.calendar.work_end, "17:00");
        assert_eq!(config.calendar.work_start, "09:00");
        assert!(config.ai.enabled);
        assert_eq!(config.plan.minutes_available, 90);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.calendar.feed_url = Some("https://calendar.example/basic.ics".into());
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.calendar.feed_url, config.calendar.feed_url);
    }
}
