use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Delay before the bot answers, long enough to see the player's mark.
pub const DEFAULT_BOT_DELAY_MS: u64 = 700;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bot_delay_ms: u64,
    pub sound_enabled: bool,
    // Absent on first run.
    pub window_width: Option<i32>,
    pub window_height: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
            sound_enabled: true,
            window_width: None,
            window_height: None,
        }
    }
}

fn config_dir() -> Result<PathBuf, StorageError> {
    ProjectDirs::from("io.github", "tictacbot", "TicTacBot")
        .map(|p| p.config_dir().to_path_buf())
        .ok_or(StorageError::NoConfigDir)
}

fn settings_path() -> Result<PathBuf, StorageError> {
    Ok(config_dir()?.join("settings.json"))
}

/// Load settings from the platform config directory, falling back to defaults.
pub fn load_settings() -> Settings {
    match settings_path().and_then(|p| read_settings(&p)) {
        Ok(Some(s)) => s,
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!(error = %e, "could not load settings, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings(s: &Settings) -> Result<(), StorageError> {
    write_settings(&settings_path()?, s)
}

/// `Ok(None)` if the file does not exist yet.
fn read_settings(path: &Path) -> Result<Option<Settings>, StorageError> {
    if !path.is_file() {
        return Ok(None);
    }
    let data = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&data)?))
}

fn write_settings(path: &Path, s: &Settings) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let data = serde_json::to_string_pretty(s)?;
    fs::write(path, data).map_err(io_err)?;
    debug!(path = %path.display(), "settings saved");
    Ok(())
}
