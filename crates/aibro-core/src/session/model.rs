//! ChatSession domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::profile::UserProfile;

/// Title given to a session until the first user message is summarized.
pub const PLACEHOLDER_TITLE: &str = "New recommendation chat";

/// One persisted recommendation conversation.
///
/// `messages` is append-only and in conversation order; the first message is
/// always the assistant's welcome. `profile_snapshot` is captured when the
/// session is created and never follows later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique among stored sessions
    pub session_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,
    pub profile_snapshot: UserProfile,
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Creates a session holding only the welcome message.
    pub fn new(session_id: impl Into<String>, profile_snapshot: UserProfile, welcome: Message) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            title: PLACEHOLDER_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            profile_snapshot,
            messages: vec![welcome],
        }
    }

    /// Appends a message and bumps `updated_at`.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Replaces the title and bumps `updated_at`.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn touch(&mut self) {
        let now = Utc::now();
        // Keep updated_at monotonic even if the wall clock steps back.
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    fn session() -> ChatSession {
        ChatSession::new(
            "s-1",
            UserProfile::placeholder(),
            Message::assistant("welcome", "hello"),
        )
    }

    #[test]
    fn test_new_session_has_welcome_only() {
        let s = session();
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].role, MessageRole::Assistant);
        assert!(s.has_placeholder_title());
        assert_eq!(s.user_message_count(), 0);
    }

    #[test]
    fn test_append_grows_and_preserves_prefix() {
        let mut s = session();
        let before = s.clone();
        s.append(Message::user("m-1", "find me a loan"));
        assert_eq!(s.messages.len(), before.messages.len() + 1);
        assert_eq!(&s.messages[..before.messages.len()], &before.messages[..]);
        assert!(s.updated_at >= before.updated_at);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut s = session();
        s.append(Message::user("m-1", "hi"));
        let json = serde_json::to_string(&s).unwrap();
        let back: ChatSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(json.contains("\"role\":\"user\""));
    }
}
