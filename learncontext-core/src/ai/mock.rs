use crate::ai::{error::AiError, provider::AiProvider, types::*};
use std::sync::{Arc, Mutex};

/// Mock behavior for the mock provider
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Echo a short acknowledgement of the last user turn
    #[default]
    Success,
    /// Always reply with the given text
    FixedText { text: String },
    /// Always fail with an API error carrying this message
    AlwaysError { message: String },
    /// Play behaviors in order, then fall back to `Success`
    Queue { behaviors: Vec<MockBehavior> },
}

/// Mock AI provider for testing
#[derive(Clone, Default)]
pub struct MockProvider {
    behavior: Arc<Mutex<MockBehavior>>,
    captured_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fixed_text(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::FixedText { text: text.into() })
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn get_call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn get_captured_requests(&self) -> Vec<CompletionRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn get_last_captured_request(&self) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    fn next_behavior(&self) -> MockBehavior {
        let mut behavior = self.behavior.lock().unwrap();
        if let MockBehavior::Queue { behaviors } = &mut *behavior {
            if behaviors.is_empty() {
                return MockBehavior::Success;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }
}

#[async_trait::async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AiError> {
        self.captured_requests.lock().unwrap().push(request.clone());

        let text = match self.next_behavior() {
            MockBehavior::Success | MockBehavior::Queue { .. } => {
                let last = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                format!("Mock response to: {last}")
            }
            MockBehavior::FixedText { text } => text,
            MockBehavior::AlwaysError { message } => {
                return Err(AiError::Api {
                    status: 500,
                    message,
                });
            }
        };

        let tokens_used = u32::try_from(text.len().div_ceil(4)).ok();
        Ok(CompletionResponse { text, tokens_used })
    }
}
