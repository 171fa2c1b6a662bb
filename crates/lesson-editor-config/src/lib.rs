use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where Ctrl-S writes the pending edits as JSON.
    pub export_path: PathBuf,
    /// JSON-lines log of every host message, if set.
    pub notifications_path: Option<PathBuf>,
    /// Editing mode at startup.
    pub editing_enabled: bool,
    /// `tracing` filter directive, e.g. `lesson_editor_engine=debug`.
    pub log_filter: String,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from("lesson-edits.json"),
            notifications_path: None,
            editing_enabled: true,
            log_filter: "info".to_string(),
            log_path: PathBuf::from("lesson-editor.log"),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.expand_paths();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/lesson-editor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    // Expand shell variables and tilde in every configured path
    fn expand_paths(&mut self) {
        self.export_path = Self::expand_path(&self.export_path).unwrap_or_else(|| self.export_path.clone());
        self.log_path = Self::expand_path(&self.log_path).unwrap_or_else(|| self.log_path.clone());
        if let Some(path) = self.notifications_path.take() {
            self.notifications_path = Some(Self::expand_path(&path).unwrap_or(path));
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
