use std::sync::Arc;

use tracing::{debug, warn};

use super::LearningAssistant;
use crate::ai::error::AiError;
use crate::chat::{ChatMessage, ChatSession, MessageMetadata};
use crate::grading::topic_label;
use crate::memory::store::MemoryStore;

/// One tutoring conversation for one learner.
pub struct TutorSession {
    assistant: Arc<LearningAssistant>,
    store: MemoryStore,
    chat: ChatSession,
    session_counted: bool,
}

impl TutorSession {
    pub fn new(assistant: Arc<LearningAssistant>, store: MemoryStore, user_id: &str) -> Self {
        Self {
            assistant,
            store,
            chat: ChatSession::new(user_id),
            session_counted: false,
        }
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn user_id(&self) -> &str {
        &self.chat.user_id
    }

    /// Sends one learner message. Blank input is ignored. The learner's
    /// turn is recorded before the model is called, so it survives a
    /// transport error.
    pub async fn send(&mut self, input: &str) -> Result<Option<ChatMessage>, AiError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let user_id = self.chat.user_id.clone();
        if !self.session_counted {
            self.store.increment_session(&user_id);
            self.session_counted = true;
        }

        if input.split_whitespace().nth(1).is_some() {
            self.store.add_recent_topic(&user_id, &topic_label(input));
        }

        let memory = self.store.get(&user_id);
        self.chat.push(ChatMessage::user(input));

        let history = &self.chat.messages()[..self.chat.messages().len() - 1];
        let reply = match self
            .assistant
            .send_tutor_message(input, Some(&memory), history)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id = %user_id, "Tutor request failed: {e}");
                return Err(e);
            }
        };

        debug!(user_id = %user_id, demo = reply.demo, tokens_used = ?reply.tokens_used, "Tutor replied");
        let message = ChatMessage::assistant(reply.content).with_metadata(MessageMetadata {
            memory_used: true,
            tokens_used: reply.tokens_used,
        });
        self.chat.push(message.clone());
        Ok(Some(message))
    }
}
