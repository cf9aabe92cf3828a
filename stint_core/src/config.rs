//! Configuration file support for Stint.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/stint/config.toml`.

use crate::{engine, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goal: GoalConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Goal defaults used when a new profile is created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_goal_hours")]
    pub default_daily_goal_hours: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            default_daily_goal_hours: default_daily_goal_hours(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("stint")
}

fn default_daily_goal_hours() -> f64 {
    2.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        engine::validate_goal(config.goal.default_daily_goal_hours).map_err(|_| {
            Error::Config(format!(
                "default_daily_goal_hours must be greater than 0, got {}",
                config.goal.default_daily_goal_hours
            ))
        })?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("stint").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.goal.default_daily_goal_hours, 2.0);
        assert!(config.data.data_dir.ends_with("stint"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::default();
        config.save_to(&path).unwrap();
        let parsed = Config::load_from(&path).unwrap();

        assert_eq!(
            config.goal.default_daily_goal_hours,
            parsed.goal.default_daily_goal_hours
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[goal]
default_daily_goal_hours = 3.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.goal.default_daily_goal_hours, 3.5);
        assert!(config.data.data_dir.ends_with("stint")); // default
    }

    #[test]
    fn test_non_positive_goal_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[goal]\ndefault_daily_goal_hours = 0.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
