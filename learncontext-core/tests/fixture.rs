use std::sync::Arc;

use chrono::Utc;
use learncontext_core::{
    ai::mock::MockProvider,
    ai::types::CompletionRequest,
    assistant::{Backend, LearningAssistant, TutorSession},
    chat::ChatMessage,
    memory::{store::MemoryStore, UserMemory},
    persistence::JsonFileStore,
};
use tempfile::TempDir;

#[allow(unused_imports)]
pub use learncontext_core::ai::mock::MockBehavior;

#[allow(dead_code)]
pub const USER: &str = "learner";

/// A file-backed memory store in a temp dir plus a mock model provider.
pub struct Fixture {
    pub store: MemoryStore,
    pub data_dir: TempDir,
    assistant: Arc<LearningAssistant>,
    mock_provider: MockProvider,
}

impl Fixture {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_mock_behavior(MockBehavior::Success)
    }

    #[allow(dead_code)]
    pub fn with_mock_behavior(behavior: MockBehavior) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let data_dir = TempDir::new().unwrap();
        let store = MemoryStore::new(Arc::new(JsonFileStore::new(data_dir.path())));

        // Clones share the same captured requests
        let mock_provider = MockProvider::new(behavior);
        let assistant = Arc::new(LearningAssistant::new(Backend::Live(Arc::new(
            mock_provider.clone(),
        ))));

        Self {
            store,
            data_dir,
            assistant,
            mock_provider,
        }
    }

    #[allow(dead_code)]
    pub fn set_mock_behavior(&self, behavior: MockBehavior) {
        self.mock_provider.set_behavior(behavior);
    }

    #[allow(dead_code)]
    pub fn captured_requests(&self) -> Vec<CompletionRequest> {
        self.mock_provider.get_captured_requests()
    }

    #[allow(dead_code)]
    pub fn assistant(&self) -> Arc<LearningAssistant> {
        self.assistant.clone()
    }

    #[allow(dead_code)]
    pub fn tutor_session(&self) -> TutorSession {
        TutorSession::new(self.assistant.clone(), self.store.clone(), USER)
    }

    /// A second store handle over the same directory, as another process
    /// would see it.
    #[allow(dead_code)]
    pub fn reopen_store(&self) -> MemoryStore {
        MemoryStore::new(Arc::new(JsonFileStore::new(self.data_dir.path())))
    }
}

/// A default profile adjusted by `edit`, built without touching any store.
#[allow(dead_code)]
pub fn memory_with(edit: impl FnOnce(&mut UserMemory)) -> UserMemory {
    let mut memory = UserMemory::new(USER, Utc::now());
    edit(&mut memory);
    memory
}

/// Alternating user/assistant turns numbered from zero.
#[allow(dead_code)]
pub fn numbered_history(count: usize) -> Vec<ChatMessage> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                ChatMessage::user(format!("message {i}"))
            } else {
                ChatMessage::assistant(format!("message {i}"))
            }
        })
        .collect()
}
