//! Session repository trait.
//!
//! Defines the interface for chat-session persistence operations.

use async_trait::async_trait;

use super::model::ChatSession;
use crate::error::Result;

/// An abstract repository for the ordered list of chat sessions.
///
/// The list is kept most-recent-first on insert: a new session is prepended,
/// an existing one is replaced in place.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists all stored sessions in stored order.
    async fn list_all(&self) -> Result<Vec<ChatSession>>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ChatSession))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// Replaces the session with the same ID, or prepends it if absent.
    async fn upsert(&self, session: &ChatSession) -> Result<()>;

    /// Deletes a session. Deleting an unknown ID is a no-op.
    async fn delete(&self, session_id: &str) -> Result<()>;
}
