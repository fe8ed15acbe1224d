//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Announcement;

/// Author of a message. There is no system or tool role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the business owner.
    User,
    /// Message from the assistant.
    Assistant,
}

/// One conversational turn. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within its session
    pub message_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Ranked announcements; only present on recommendation-delivery turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Announcement>>,
}

impl Message {
    pub fn user(message_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(message_id, MessageRole::User, content)
    }

    pub fn assistant(message_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(message_id, MessageRole::Assistant, content)
    }

    fn new(message_id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            recommendations: None,
        }
    }

    pub fn with_recommendations(mut self, recommendations: Vec<Announcement>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
