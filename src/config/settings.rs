//! User settings persisted to settings.json
//!
//! Single record, rewritten in full on every save.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::constants::env as env_vars;
use crate::constants::logging::DEFAULT_LEVEL;
use crate::persistence;
use crate::types::Position;

/// Color palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ThemeChoice::Dark),
            "light" => Some(ThemeChoice::Light),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeChoice::Dark => write!(f, "dark"),
            ThemeChoice::Light => write!(f, "light"),
        }
    }
}

/// Unknown theme names fall back to dark instead of discarding the whole file
impl<'de> Deserialize<'de> for ThemeChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(ThemeChoice::parse(&name).unwrap_or_else(|| {
            warn!(theme = %name, "Unknown theme, using dark");
            ThemeChoice::Dark
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Launch at login
    #[serde(default)]
    pub autostart: bool,

    #[serde(default)]
    pub theme: ThemeChoice,

    /// Tracing filter level (error/warn/info/debug/trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Last position the widget was dragged to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

fn default_log_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autostart: false,
            theme: ThemeChoice::Dark,
            log_level: default_log_level(),
            position: None,
        }
    }
}

impl Settings {
    /// Load settings, apply env var overrides and validate
    pub fn load(path: &Path) -> Self {
        let mut settings: Settings = persistence::load_or_default(path);
        settings.apply_env_overrides();
        settings.validate_and_clamp();
        info!(theme = %settings.theme, autostart = settings.autostart, "Loaded settings");
        settings
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::save_json(path, self).context("Failed to save settings")
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            env::var(env_vars::THEME).ok().as_deref(),
            env::var(env_vars::LOG_LEVEL).ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, theme: Option<&str>, log_level: Option<&str>) {
        if let Some(name) = theme {
            match ThemeChoice::parse(name) {
                Some(theme) => self.theme = theme,
                None => warn!(var = env_vars::THEME, value = %name, "Ignoring unknown theme override"),
            }
        }
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
    }

    /// Clamp values to what the rest of the program accepts
    fn validate_and_clamp(&mut self) {
        let normalized = super::normalize_level(&self.log_level);
        if normalized != self.log_level.trim().to_ascii_lowercase() {
            warn!(log_level = %self.log_level, using = %normalized, "Unknown log_level, using default");
        }
        self.log_level = normalized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings: Settings = persistence::load_or_default(&dir.path().join("settings.json"));
        settings.validate_and_clamp();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_legacy_file_without_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme": "light", "autostart": true}"#).unwrap();

        let settings: Settings = persistence::load_or_default(&path);
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert!(settings.autostart);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.position, None);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dark() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "neon", "autostart": true}"#).unwrap();
        assert_eq!(settings.theme, ThemeChoice::Dark);
        assert!(settings.autostart);
    }

    #[test]
    fn test_save_roundtrip_keeps_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            position: Some(Position::new(1500, 900)),
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let loaded: Settings = persistence::load_or_default(&path);
        assert_eq!(loaded.position, Some(Position::new(1500, 900)));
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some("LIGHT"), Some("debug"));
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.log_level, "debug");

        settings.apply_overrides(Some("plaid"), None);
        assert_eq!(settings.theme, ThemeChoice::Light);
    }

    #[test]
    fn test_validate_clamps_log_level() {
        let mut settings = Settings {
            log_level: "chatty".into(),
            ..Default::default()
        };
        settings.validate_and_clamp();
        assert_eq!(settings.log_level, "info");

        settings.log_level = "WARN".into();
        settings.validate_and_clamp();
        assert_eq!(settings.log_level, "warn");
    }
}
