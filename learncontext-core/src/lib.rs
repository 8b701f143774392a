pub mod ai;
pub mod assistant;
pub mod chat;
pub mod demo;
pub mod feedback;
pub mod grading;
pub mod memory;
pub mod persistence;
pub mod prompt;
pub mod settings;
pub mod tokens;

// Public library API. Everything is public, but these are the types most
// callers need.
pub use ai::provider::AiProvider;
pub use ai::AiError;
pub use assistant::{Backend, LearningAssistant, TutorReply, TutorSession};
pub use chat::{ChatMessage, ChatSession, MessageMetadata};
pub use feedback::{parse_feedback, GradingFeedback};
pub use grading::{record_grading_outcome, GradingRequest};
pub use memory::store::MemoryStore;
pub use memory::{
    ExplanationStyle, MemoryUpdate, SkillLevel, TimeAvailability, TonePreference, UserMemory,
};
pub use persistence::{InMemoryStore, JsonFileStore, KeyValueStore};
pub use prompt::{build_prompt, BuiltPrompt, PromptBuilder, PromptMode, PromptRequest};
pub use settings::{Settings, SettingsManager};
pub use tokens::estimate_tokens;
