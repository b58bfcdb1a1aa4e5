//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Which storage backend holds the habit snapshot
//! - How completions are credited to identity streaks
//! - Initial whimsy level and an optional message seed
//!
//! Configuration is stored at `~/.config/tinywins/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::messages::WhimsyLevel;

/// Where the store snapshot is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
    Memory,
}

/// Which identity a completion is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakAttribution {
    /// The completed habit's own identity, falling back to the selected
    /// identity when the habit is unknown.
    #[default]
    Habit,
    /// Whatever identity is selected at completion time.
    SelectedIdentity,
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub streak_attribution: StreakAttribution,
}

/// Celebration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CelebrationConfig {
    /// Whimsy level for a store with no saved state.
    #[serde(default)]
    pub whimsy_level: WhimsyLevel,
    /// Fixed RNG seed for reproducible message picks.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tinywins/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let clears_optional = matches!(value.trim(), "" | "none")
                    && matches!(existing, serde_json::Value::Null | serde_json::Value::Number(_));

                let new_value = match existing {
                    // Optionals accept "none" or "" to unset. A required field
                    // rejects the null when the result is deserialized.
                    _ if clears_optional => serde_json::Value::Null,
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    serde_json::Value::Null => match value.trim().parse::<u64>() {
                        Ok(n) => serde_json::Value::Number(n.into()),
                        Err(_) => serde_json::Value::String(value.trim().into()),
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot assign a whole section".into()));
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key. The result must
    /// still deserialize, so enum keys only accept their known variants.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
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
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.store.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[celebration]\nwhimsy_level = \"maximum\"\n").unwrap();
        assert_eq!(parsed.celebration.whimsy_level, WhimsyLevel::Maximum);
        assert_eq!(parsed.store.streak_attribution, StreakAttribution::Habit);
        assert!(parsed.celebration.seed.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("store.backend").as_deref(), Some("sqlite"));
        assert_eq!(cfg.get("celebration.whimsy_level").as_deref(), Some("normal"));
        assert_eq!(cfg.get("celebration.seed").as_deref(), Some("null"));
        assert!(cfg.get("store.missing_key").is_none());
        assert!(cfg.get("store").is_none());
    }

    #[test]
    fn apply_updates_enum_value() {
        let mut cfg = Config::default();
        cfg.apply("store.streak_attribution", "selected_identity").unwrap();
        assert_eq!(cfg.store.streak_attribution, StreakAttribution::SelectedIdentity);
    }

    #[test]
    fn apply_rejects_unknown_variant() {
        let mut cfg = Config::default();
        let err = cfg.apply("store.backend", "postgres").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.store.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn apply_sets_and_clears_optional_seed() {
        let mut cfg = Config::default();
        cfg.apply("celebration.seed", "42").unwrap();
        assert_eq!(cfg.celebration.seed, Some(42));
        cfg.apply("celebration.seed", "0").unwrap();
        assert_eq!(cfg.celebration.seed, Some(0));
        cfg.apply("celebration.seed", "none").unwrap();
        assert_eq!(cfg.celebration.seed, None);

        cfg.apply("celebration.seed", "7").unwrap();
        cfg.apply("celebration.seed", "").unwrap();
        assert_eq!(cfg.celebration.seed, None);
    }

    #[test]
    fn load_from_unreadable_path_fails_without_writing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Config(ConfigError::LoadFailed { .. })
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn apply_rejects_garbage_seed_and_keeps_old_value() {
        let mut cfg = Config::default();
        cfg.apply("celebration.seed", "42").unwrap();
        assert!(cfg.apply("celebration.seed", "forty").is_err());
        assert_eq!(cfg.celebration.seed, Some(42));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("store.nonexistent", "x").unwrap_err(),
            ConfigError::UnknownKey(_)
        ));
        assert!(matches!(cfg.apply("", "x").unwrap_err(), ConfigError::UnknownKey(_)));
    }

    #[test]
    fn load_from_missing_writes_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nbackend = 12\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
