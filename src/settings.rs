//! Persisted presentation preference
//!
//! A single light/dark value, read once at startup and written back on every
//! change. The studio receives a [`Settings`] value instead of reaching for a
//! global.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, StudioError};
use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown theme '{other}'. Use light or dark.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    theme: Option<ThemePreference>,
}

/// Loaded settings plus the file they persist to
#[derive(Debug, Clone)]
pub struct Settings {
    theme: ThemePreference,
    path: Option<PathBuf>,
}

impl Settings {
    /// Settings that never touch disk, for tests and headless runs
    pub fn in_memory(theme: ThemePreference) -> Self {
        Self { theme, path: None }
    }

    /// Load from the default location under the config directory
    pub fn load_default() -> Self {
        match crate::config::app_config_dir() {
            Ok(dir) => Self::load(dir.join("settings.toml")),
            Err(e) => {
                log_warn!("No config directory for settings, theme will not persist: {}", e);
                Self::in_memory(initial_theme(None))
            }
        }
    }

    /// Load from `path`; unreadable or absent files fall back to the default
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stored = fs::read_to_string(&path)
            .ok()
            .and_then(|content| match toml::from_str::<SettingsFile>(&content) {
                Ok(file) => file.theme,
                Err(e) => {
                    log_warn!("Ignoring malformed settings at {}: {}", path.display(), e);
                    None
                }
            });
        let theme = initial_theme(stored);
        log_debug!("Theme preference: {}", theme);
        Self {
            theme,
            path: Some(path),
        }
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the theme and persist it
    pub fn set_theme(&mut self, theme: ThemePreference) -> Result<()> {
        self.theme = theme;
        self.save()
    }

    /// Flip light/dark and persist. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<ThemePreference> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = SettingsFile {
            theme: Some(self.theme),
        };
        let content = toml::to_string(&file)
            .map_err(|e| StudioError::io("Failed to encode settings", std::io::Error::other(e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StudioError::io("Failed to create settings directory", e))?;
        }
        fs::write(path, content).map_err(|e| StudioError::io("Failed to save settings", e))
    }
}

/// Stored preference, else a guess from the terminal's `COLORFGBG`, else dark
fn initial_theme(stored: Option<ThemePreference>) -> ThemePreference {
    stored
        .or_else(|| std::env::var("COLORFGBG").ok().and_then(|v| theme_from_colorfgbg(&v)))
        .unwrap_or_default()
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); backgrounds 7 and 15 are light
fn theme_from_colorfgbg(value: &str) -> Option<ThemePreference> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if bg == 7 || bg == 15 {
        ThemePreference::Light
    } else {
        ThemePreference::Dark
    })
}
