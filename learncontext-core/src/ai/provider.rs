use crate::ai::{error::AiError, types::*};

#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One chat completion. Implementations never retry.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, AiError>;
}
