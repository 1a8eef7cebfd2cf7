//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Defaults for new items (category, block length)
//! - Water tracker goal and step size
//! - Appearance (dark mode)
//!
//! Configuration is stored at `~/.config/dayboard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::item::Category;

/// Defaults applied when the CLI creates items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_block_duration")]
    pub block_duration: u32,
}

/// Water tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterConfig {
    /// Daily goal in fluid ounces.
    #[serde(default = "default_goal_oz")]
    pub goal_oz: u32,
    /// Amount added or removed per step.
    #[serde(default = "default_step_oz")]
    pub step_oz: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayboard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_block_duration() -> u32 {
    60
}
fn default_goal_oz() -> u32 {
    64
}
fn default_step_oz() -> u32 {
    8
}
fn default_true() -> bool {
    true
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            category: Category::Work,
            block_duration: default_block_duration(),
        }
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            goal_oz: default_goal_oz(),
            step_oz: default_step_oz(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf key".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (including an unknown category name).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.ui.dark_mode);
        assert_eq!(parsed.water.goal_oz, 64);
        assert_eq!(parsed.defaults.category, Category::Work);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[water]\ngoal_oz = 80\n").unwrap();
        assert_eq!(parsed.water.goal_oz, 80);
        assert_eq!(parsed.water.step_oz, 8);
        assert_eq!(parsed.defaults.block_duration, 60);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("ui.dark_mode").as_deref(), Some("true"));
        assert_eq!(cfg.get("water.goal_oz").as_deref(), Some("64"));
        assert_eq!(cfg.get("defaults.category").as_deref(), Some("work"));
        assert!(cfg.get("ui.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_nested_fields() {
        let mut cfg = Config::default();
        cfg.set_value("ui.dark_mode", "false").unwrap();
        cfg.set_value("water.step_oz", "12").unwrap();
        cfg.set_value("defaults.category", "self-care").unwrap();
        assert!(!cfg.ui.dark_mode);
        assert_eq!(cfg.water.step_oz, 12);
        assert_eq!(cfg.defaults.category, Category::SelfCare);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("ui.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set_value("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_value_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("ui.dark_mode", "not_a_bool").is_err());
        assert!(cfg.set_value("water.goal_oz", "-3").is_err());
        assert!(cfg.set_value("defaults.category", "chores").is_err());
        assert!(cfg.set_value("water", "1").is_err());
        assert!(cfg.ui.dark_mode);
    }
}
