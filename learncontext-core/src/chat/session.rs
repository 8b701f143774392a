use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ChatMessage;
use crate::ai::types::MessageRole;

const TITLE_MAX_CHARS: usize = 50;

/// An append-only conversation between one learner and the tutor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: "New Session".to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        let first_user_turn = message.role == MessageRole::User
            && !self.messages.iter().any(|m| m.role == MessageRole::User);
        if first_user_turn {
            self.title = truncate_title(&message.content);
        }
        self.updated_at = message.timestamp.max(self.updated_at);
        self.messages.push(message);
    }
}

fn truncate_title(text: &str) -> String {
    let text = text.trim();
    let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_user_message() {
        let mut session = ChatSession::new("alice");
        assert_eq!(session.title, "New Session");

        session.push(ChatMessage::assistant("Welcome back!"));
        assert_eq!(session.title, "New Session");

        session.push(ChatMessage::user("What is a derivative?"));
        session.push(ChatMessage::user("And an integral?"));
        assert_eq!(session.title, "What is a derivative?");
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_long_title_truncated() {
        let mut session = ChatSession::new("alice");
        session.push(ChatMessage::user("x".repeat(60)));
        assert_eq!(session.title, format!("{}...", "x".repeat(50)));
    }
}
