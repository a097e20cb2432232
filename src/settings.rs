// src/settings.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{
    constants::{APP_CONFIG_DIR, DEFAULT_HISTORY_SIZE, INIT_STATE, SETTINGS_FILENAME},
    core::diagnostics::{Reporter, WarningsLevel},
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML settings at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Limits of the command history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_size: usize,
    /// Evict the oldest note when full instead of refusing new ones.
    pub is_write_overflow: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_HISTORY_SIZE,
            is_write_overflow: true,
        }
    }
}

/// Runtime context shared by every validation and parsing step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub warnings_level: WarningsLevel,
    pub current_state: String,
    pub history: HistorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            warnings_level: WarningsLevel::Strict,
            current_state: INIT_STATE.to_string(),
            history: HistorySettings::default(),
        }
    }
}

impl Settings {
    pub fn new(warnings_level: WarningsLevel) -> Self {
        Self {
            warnings_level,
            ..Self::default()
        }
    }

    /// A fresh reporter applying this settings' warnings level.
    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.warnings_level)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads settings from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Loading settings from '{}'", path.display());
        Self::from_toml_str(&content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// `<config dir>/cmdsys/settings.toml`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        Ok(dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join(APP_CONFIG_DIR)
            .join(SETTINGS_FILENAME))
    }

    /// Loads `path` if given, else the default settings file if it exists,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Ok(default_path) if default_path.is_file() => Self::load(&default_path),
            _ => Ok(Self::default()),
        }
    }
}
