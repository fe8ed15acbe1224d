//! Configuration file management.
//!
//! Reads `config.toml` (application settings) and `secret.json` (API keys)
//! from the config directory. Every setting has a default, so a missing
//! `config.toml` is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use aibro_core::catalog::Category;
use aibro_core::error::{AibroError, Result};
use aibro_core::recommendation::{DEFAULT_CANDIDATE_CAP, LookupMissPolicy};
use serde::{Deserialize, Serialize};

use crate::paths::AibroPaths;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Environment variable overriding the Gemini API key from `secret.json`.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root structure of `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub oracle: OracleSettings,
    pub recommendation: RecommendationSettings,
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    /// Maximum number of candidates sent to the oracle
    pub candidate_cap: usize,
    pub lookup_miss: LookupMissPolicy,
    /// Restrict candidates to one category
    pub candidate_category: Option<Category>,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            candidate_cap: DEFAULT_CANDIDATE_CAP,
            lookup_miss: LookupMissPolicy::default(),
            candidate_category: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `aibro_application=debug`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Raw catalog JSON; the bundled seed catalog is used when unset
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `config.toml` from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&AibroPaths::config_file()?)
    }

    /// Loads a config file, falling back to defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        if config.recommendation.candidate_cap == 0 {
            return Err(AibroError::config("recommendation.candidate_cap must be at least 1"));
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl SecretConfig {
    /// Loads `secret.json` from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&AibroPaths::secret_file()?)
    }

    /// Loads a secrets file; a missing file yields an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AibroError::config(format!(
                "Failed to parse secret file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Returns the Gemini API key, preferring `GEMINI_API_KEY`.
    pub fn gemini_api_key(&self) -> Option<String> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.gemini
                    .as_ref()
                    .map(|g| g.api_key.clone())
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// Model override from `secret.json`, if any.
    pub fn gemini_model(&self) -> Option<&str> {
        self.gemini.as_ref().and_then(|g| g.model_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.recommendation.candidate_cap, 10);
        assert_eq!(config.oracle.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[recommendation]
candidate_cap = 5
lookup_miss = "reject"
candidate_category = "loan"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.recommendation.candidate_cap, 5);
        assert_eq!(config.recommendation.lookup_miss, LookupMissPolicy::Reject);
        assert_eq!(config.recommendation.candidate_category, Some(Category::Loan));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.oracle.timeout_secs, 60);
    }

    #[test]
    fn test_zero_candidate_cap_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[recommendation]\ncandidate_cap = 0\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_secret_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(
            &path,
            r#"{"gemini": {"api_key": "k-123", "model_name": "gemini-2.0-flash"}}"#,
        )
        .unwrap();
        let secret = SecretConfig::load_from(&path).unwrap();
        assert_eq!(secret.gemini_model(), Some("gemini-2.0-flash"));
        assert!(secret.gemini.is_some());

        let missing = SecretConfig::load_from(&dir.path().join("none.json")).unwrap();
        assert!(missing.gemini.is_none());
    }
}
