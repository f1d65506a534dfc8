//! Replay configuration (~/.config/HexReplay/config.toml)
//!
//! Handles loading, saving, and providing defaults for where replays are
//! stored and which format new saves use.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::replay::{ReplayEncoding, ReplayFile};

/// Replay storage configuration.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Directory for saved replays (default: `<data dir>/replays`)
    #[serde(default)]
    pub replays_dir: Option<PathBuf>,
    /// Save new replays compressed as `.ohr.z` (default: true)
    #[serde(default = "default_true")]
    pub compress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            replays_dir: None,
            compress: default_true(),
        }
    }
}

impl ReplayConfig {
    /// Effective replay directory.
    ///
    /// Returns `None` if no override is set and the home directory cannot be
    /// determined.
    pub fn replays_dir(&self) -> Option<PathBuf> {
        self.replays_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("replays")))
    }

    /// Encoding used for new saves
    pub fn encoding(&self) -> ReplayEncoding {
        if self.compress {
            ReplayEncoding::Compressed
        } else {
            ReplayEncoding::Raw
        }
    }

    /// Full path a replay would be saved to
    pub fn path_for(&self, replay: &ReplayFile) -> Option<PathBuf> {
        let mut name = replay.create_filename();
        if self.compress {
            name.push_str(".z");
        }
        self.replays_dir().map(|dir| dir.join(name))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\HexReplay\config`
/// On macOS: `~/Library/Application Support/io.hexreplay.HexReplay`
/// On Linux: `~/.config/HexReplay`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.hexreplay", "", "HexReplay")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.hexreplay", "", "HexReplay")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> ReplayConfig {
    config_dir()
        .map(|dir| load_from(&dir.join("config.toml")))
        .unwrap_or_default()
}

/// Loads the configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> ReplayConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return ReplayConfig::default(),
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            ReplayConfig::default()
        }
    }
}

/// Saves the configuration to the platform config directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &ReplayConfig) -> io::Result<()> {
    if let Some(dir) = config_dir() {
        save_to(config, &dir.join("config.toml"))?;
    }
    Ok(())
}

/// Saves the configuration to an explicit path, creating parent directories.
pub fn save_to(config: &ReplayConfig, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(io::Error::other)?;
    std::fs::write(path, content)
}
