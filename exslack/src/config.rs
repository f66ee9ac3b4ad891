use directories::BaseDirs;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".exslackrc";
pub const DEFAULT_MAX_AGE: u32 = 7;
pub const DEFAULT_MAX_BACKUPS: u32 = 5;
pub const DEFAULT_MAX_SIZE: u64 = 100;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(rename = "webHookURL", default)]
    pub web_hook_url: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Days to keep rotated log files.
    #[serde(default)]
    pub max_age: u32,
    /// Number of rotated log files to keep.
    #[serde(default)]
    pub max_backups: u32,
    /// Size in megabytes at which the log file is rotated.
    #[serde(default)]
    pub max_size: u64,
}

/// `~/.exslackrc`
pub fn default_path() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHome)
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(s)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        log::debug!("loaded config from {}", path.display());
        Self::from_str(&contents)
    }

    pub fn apply_defaults(&mut self) {
        if self.max_age == 0 {
            self.max_age = DEFAULT_MAX_AGE;
        }
        if self.max_backups == 0 {
            self.max_backups = DEFAULT_MAX_BACKUPS;
        }
        if self.max_size == 0 {
            self.max_size = DEFAULT_MAX_SIZE;
        }
        if self.log_dir.as_ref().is_some_and(|dir| dir.as_os_str().is_empty()) {
            self.log_dir = None;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web_hook_url.is_empty() {
            return Err(ConfigError::Missing("webHookURL"));
        }
        if self.destination.is_empty() {
            return Err(ConfigError::Missing("destination"));
        }
        Ok(())
    }
}
