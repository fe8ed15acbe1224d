//! JSON-file implementation of the durable store.

use std::path::Path;

use aibro_core::error::{AibroError, Result};
use aibro_core::profile::{ProfileRepository, UserProfile};
use aibro_core::saved::SavedPolicyRepository;
use aibro_core::session::{ChatSession, SessionRepository};
use aibro_core::settings::{Settings, SettingsRepository};
use async_trait::async_trait;

use crate::storage::{AtomicJsonError, AtomicJsonFile};

const PROFILE_FILE: &str = "profile.json";
const SAVED_POLICIES_FILE: &str = "saved_policies.json";
const CHAT_SESSIONS_FILE: &str = "chat_sessions.json";
const SETTINGS_FILE: &str = "settings.json";

/// Durable store keeping each record in its own JSON file.
///
/// ```text
/// base_dir/
/// ├── profile.json          # UserProfile
/// ├── saved_policies.json   # ["L001", ...]
/// ├── chat_sessions.json    # [ChatSession, ...] most-recent-first
/// └── settings.json         # {"reuseProfile": true}
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    profile: AtomicJsonFile<UserProfile>,
    saved: AtomicJsonFile<Vec<String>>,
    sessions: AtomicJsonFile<Vec<ChatSession>>,
    settings: AtomicJsonFile<Settings>,
}

impl JsonFileStore {
    /// Creates a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        Ok(Self {
            profile: AtomicJsonFile::new(base_dir.join(PROFILE_FILE)),
            saved: AtomicJsonFile::new(base_dir.join(SAVED_POLICIES_FILE)),
            sessions: AtomicJsonFile::new(base_dir.join(CHAT_SESSIONS_FILE)),
            settings: AtomicJsonFile::new(base_dir.join(SETTINGS_FILE)),
        })
    }
}

/// Runs blocking file I/O off the async executor.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::result::Result<T, AtomicJsonError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AibroError::internal(format!("Failed to join task: {}", e)))?
        .map_err(AibroError::from)
}

#[async_trait]
impl ProfileRepository for JsonFileStore {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        let file = self.profile.clone();
        blocking(move || file.load()).await
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let file = self.profile.clone();
        let profile = profile.clone();
        blocking(move || file.save(&profile)).await
    }
}

#[async_trait]
impl SavedPolicyRepository for JsonFileStore {
    async fn get_saved_ids(&self) -> Result<Vec<String>> {
        let file = self.saved.clone();
        Ok(blocking(move || file.load()).await?.unwrap_or_default())
    }

    async fn save_id(&self, policy_id: &str) -> Result<()> {
        let file = self.saved.clone();
        let policy_id = policy_id.to_string();
        blocking(move || {
            file.update(Vec::new(), |ids| {
                if !ids.contains(&policy_id) {
                    ids.push(policy_id);
                }
            })
        })
        .await
    }

    async fn remove_id(&self, policy_id: &str) -> Result<()> {
        let file = self.saved.clone();
        let policy_id = policy_id.to_string();
        blocking(move || file.update(Vec::new(), |ids| ids.retain(|id| *id != policy_id))).await
    }
}

#[async_trait]
impl SessionRepository for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<ChatSession>> {
        let file = self.sessions.clone();
        Ok(blocking(move || file.load()).await?.unwrap_or_default())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let sessions = self.list_all().await?;
        Ok(sessions.into_iter().find(|s| s.session_id == session_id))
    }

    async fn upsert(&self, session: &ChatSession) -> Result<()> {
        let file = self.sessions.clone();
        let session = session.clone();
        let session_id = session.session_id.clone();
        blocking(move || {
            file.update(Vec::new(), |sessions| {
                match sessions.iter().position(|s| s.session_id == session.session_id) {
                    Some(idx) => sessions[idx] = session,
                    None => sessions.insert(0, session),
                }
            })
        })
        .await?;
        tracing::debug!(session_id = %session_id, "Session committed");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let file = self.sessions.clone();
        let session_id = session_id.to_string();
        let removed = blocking(move || {
            file.update(Vec::new(), |sessions| {
                let before = sessions.len();
                sessions.retain(|s| s.session_id != session_id);
                before - sessions.len()
            })
        })
        .await?;
        tracing::debug!(removed, "Session delete applied");
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for JsonFileStore {
    async fn get_settings(&self) -> Result<Settings> {
        let file = self.settings.clone();
        Ok(blocking(move || file.load()).await?.unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let file = self.settings.clone();
        let settings = *settings;
        blocking(move || file.save(&settings)).await
    }
}
