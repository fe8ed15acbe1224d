//! Saved (bookmarked) announcement identifiers.

use async_trait::async_trait;

use crate::error::Result;

/// Durable record holding the set of saved policy IDs.
///
/// The set keeps insertion order and never contains duplicates.
#[async_trait]
pub trait SavedPolicyRepository: Send + Sync {
    async fn get_saved_ids(&self) -> Result<Vec<String>>;

    /// Adds an ID. Adding an already saved ID is a no-op.
    async fn save_id(&self, policy_id: &str) -> Result<()>;

    /// Removes an ID. Removing an absent ID is a no-op.
    async fn remove_id(&self, policy_id: &str) -> Result<()>;

    async fn is_saved(&self, policy_id: &str) -> Result<bool> {
        Ok(self.get_saved_ids().await?.iter().any(|id| id == policy_id))
    }
}
