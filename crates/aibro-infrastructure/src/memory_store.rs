//! In-memory durable store.
//!
//! Mirrors [`JsonFileStore`](crate::JsonFileStore) semantics without touching
//! the file system. Used by tests and by ephemeral CLI runs.

use std::sync::Mutex;

use aibro_core::error::{AibroError, Result};
use aibro_core::profile::{ProfileRepository, UserProfile};
use aibro_core::saved::SavedPolicyRepository;
use aibro_core::session::{ChatSession, SessionRepository};
use aibro_core::settings::{Settings, SettingsRepository};
use async_trait::async_trait;

#[derive(Debug, Default)]
struct Records {
    profile: Option<UserProfile>,
    saved: Vec<String>,
    sessions: Vec<ChatSession>,
    settings: Option<Settings>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Records>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a profile already saved.
    pub fn with_profile(profile: UserProfile) -> Self {
        let store = Self::new();
        if let Ok(mut records) = store.records.lock() {
            records.profile = Some(profile);
        }
        store
    }

    fn with_records<R>(&self, f: impl FnOnce(&mut Records) -> R) -> Result<R> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| AibroError::internal(format!("store lock poisoned: {}", e)))?;
        Ok(f(&mut records))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        self.with_records(|r| r.profile.clone())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.with_records(|r| r.profile = Some(profile.clone()))
    }
}

#[async_trait]
impl SavedPolicyRepository for InMemoryStore {
    async fn get_saved_ids(&self) -> Result<Vec<String>> {
        self.with_records(|r| r.saved.clone())
    }

    async fn save_id(&self, policy_id: &str) -> Result<()> {
        self.with_records(|r| {
            if !r.saved.iter().any(|id| id == policy_id) {
                r.saved.push(policy_id.to_string());
            }
        })
    }

    async fn remove_id(&self, policy_id: &str) -> Result<()> {
        self.with_records(|r| r.saved.retain(|id| id != policy_id))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<ChatSession>> {
        self.with_records(|r| r.sessions.clone())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>> {
        self.with_records(|r| {
            r.sessions
                .iter()
                .find(|s| s.session_id == session_id)
                .cloned()
        })
    }

    async fn upsert(&self, session: &ChatSession) -> Result<()> {
        self.with_records(|r| {
            match r
                .sessions
                .iter()
                .position(|s| s.session_id == session.session_id)
            {
                Some(idx) => r.sessions[idx] = session.clone(),
                None => r.sessions.insert(0, session.clone()),
            }
        })
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.with_records(|r| r.sessions.retain(|s| s.session_id != session_id))
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn get_settings(&self) -> Result<Settings> {
        self.with_records(|r| r.settings.unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.with_records(|r| r.settings = Some(*settings))
    }
}
