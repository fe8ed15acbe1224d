//! Unified path management for AI Bro files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/aibro/             # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/aibro/        # Data directory (durable store)
//! ├── profile.json
//! ├── saved_policies.json
//! ├── chat_sessions.json
//! ├── settings.json
//! └── logs/                    # Application logs
//!     └── aibro.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "aibro";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "AIBRO_DATA_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for aibro_core::AibroError {
    fn from(e: PathError) -> Self {
        aibro_core::AibroError::config(e.to_string())
    }
}

pub struct AibroPaths;

impl AibroPaths {
    /// Returns the configuration directory (e.g., `~/.config/aibro/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g., `~/.local/share/aibro/`).
    ///
    /// `AIBRO_DATA_DIR` takes precedence when set.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
