//! TOML-based application configuration.
//!
//! Stored at `<data_dir>/config.toml` and created with defaults on first
//! load. Values can be read and written by dot-separated key, e.g.
//! `focus.focus_duration` or `insights.enabled`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Focus timer lengths, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
}

/// Completion API settings. The key itself never lives in the file; only
/// the name of the environment variable holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// User preference toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_true")]
    pub focus_mode: bool,
    #[serde(default = "default_true")]
    pub ai_personalization: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_break_duration() -> u32 {
    5
}
fn default_true() -> bool {
    true
}
fn default_api_url() -> String {
    "https://api.deepseek.com/v1".into()
}
fn default_model() -> String {
    "deepseek-coder".into()
}
fn default_api_key_env() -> String {
    "TIJA_AI_API_KEY".into()
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            notifications: true,
            focus_mode: true,
            ai_personalization: true,
            dark_mode: false,
        }
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot replace a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default path, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// [`ConfigError::UnknownKey`] for keys that don't exist,
    /// [`ConfigError::InvalidValue`] when the value doesn't fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate(key)?;
        *self = updated;
        Ok(())
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        let positive = [
            ("focus.focus_duration", u64::from(self.focus.focus_duration)),
            ("focus.break_duration", u64::from(self.focus.break_duration)),
            ("insights.max_tokens", u64::from(self.insights.max_tokens)),
            ("insights.timeout_secs", self.insights.timeout_secs),
        ];
        match positive.iter().find(|(name, value)| *name == key && *value == 0) {
            Some(_) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "must be at least 1".into(),
            }),
            None => Ok(()),
        }
    }

    /// Flattened `(key, value)` pairs for every leaf setting.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Focus duration in seconds, as the tracker expects it. A zero in a
    /// hand-edited file falls back to the default.
    pub fn focus_duration_secs(&self) -> u64 {
        let minutes = match self.focus.focus_duration {
            0 => default_focus_duration(),
            m => m,
        };
        u64::from(minutes) * 60
    }

    /// Load from disk, returning default on error.
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
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[focus]\nfocus_duration = 50\n").unwrap();
        assert_eq!(parsed.focus.focus_duration, 50);
        assert_eq!(parsed.focus.break_duration, 5);
        assert_eq!(parsed.insights.model, "deepseek-coder");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("focus.focus_duration").as_deref(), Some("25"));
        assert_eq!(cfg.get("insights.api_key_env").as_deref(), Some("TIJA_AI_API_KEY"));
        assert_eq!(cfg.get("preferences.dark_mode").as_deref(), Some("false"));
        assert!(cfg.get("focus.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("focus.focus_duration", "50").unwrap();
        cfg.set("insights.enabled", "false").unwrap();
        cfg.set("insights.model", "other-model").unwrap();
        assert_eq!(cfg.focus.focus_duration, 50);
        assert!(!cfg.insights.enabled);
        assert_eq!(cfg.insights.model, "other-model");
        assert_eq!(cfg.focus_duration_secs(), 3000);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("focus.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("nope", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("preferences.dark_mode", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("focus.focus_duration", "-3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("focus", "1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_zero_durations() {
        let mut cfg = Config::default();
        for key in ["focus.focus_duration", "focus.break_duration", "insights.timeout_secs"] {
            assert!(
                matches!(cfg.set(key, "0"), Err(ConfigError::InvalidValue { .. })),
                "{key} accepted 0"
            );
        }
        assert_eq!(cfg, Config::default());
        cfg.set("focus.focus_duration", "1").unwrap();
        assert_eq!(cfg.focus_duration_secs(), 60);
    }

    #[test]
    fn zero_focus_duration_in_file_uses_default() {
        let parsed: Config = toml::from_str("[focus]\nfocus_duration = 0\n").unwrap();
        assert_eq!(parsed.focus_duration_secs(), 1500);
    }

    #[test]
    fn entries_lists_every_leaf() {
        let entries = Config::default().entries();
        assert!(entries.contains(&("focus.break_duration".into(), "5".into())));
        assert!(entries.contains(&("insights.timeout_secs".into(), "30".into())));
        assert_eq!(entries.len(), 12);
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg;
        changed.set("focus.break_duration", "10").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().focus.break_duration, 10);
    }

    #[test]
    fn io_failures_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        match Config::load_from(dir.path()) {
            Err(ConfigError::LoadFailed { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("Expected LoadFailed, got {other:?}"),
        }
        let missing_parent = dir.path().join("nope").join("config.toml");
        assert!(matches!(
            Config::default().save_to(&missing_parent),
            Err(ConfigError::SaveFailed { .. })
        ));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "focus = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
