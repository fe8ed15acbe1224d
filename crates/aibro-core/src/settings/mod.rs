//! Application settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// User-facing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Reuse the stored profile for new chat sessions without asking
    #[serde(default = "default_reuse_profile")]
    pub reuse_profile: bool,
}

fn default_reuse_profile() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reuse_profile: default_reuse_profile(),
        }
    }
}

/// Durable record holding the settings object.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns the stored settings, or the defaults when none are stored.
    async fn get_settings(&self) -> Result<Settings>;

    async fn save_settings(&self, settings: &Settings) -> Result<()>;
}
