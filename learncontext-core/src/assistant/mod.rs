//! Tutor and grading entry points.
//!
//! The backend is chosen once, at construction. A live backend sends each
//! request to the provider exactly once; the demo backend answers locally.

pub mod session;

pub use session::TutorSession;

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::ai::error::AiError;
use crate::ai::provider::AiProvider;
use crate::ai::types::{CompletionRequest, ModelParams};
use crate::chat::ChatMessage;
use crate::demo;
use crate::feedback::{parse_feedback, GradingFeedback};
use crate::grading::GradingRequest;
use crate::memory::UserMemory;
use crate::prompt::{PromptBuilder, PromptMode, PromptRequest};
use crate::settings::Settings;

#[derive(Clone)]
pub enum Backend {
    Live(Arc<dyn AiProvider>),
    /// No provider configured; replies are synthesized locally.
    Demo,
}

impl Backend {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(provider) => f.debug_tuple("Live").field(&provider.name()).finish(),
            Self::Demo => f.write_str("Demo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorReply {
    pub content: String,
    pub tokens_used: Option<u32>,
    pub demo: bool,
}

#[derive(Debug, Clone)]
pub struct LearningAssistant {
    backend: Backend,
    prompt_builder: PromptBuilder,
    tutor_params: ModelParams,
    grading_params: ModelParams,
}

impl LearningAssistant {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            prompt_builder: PromptBuilder::default(),
            tutor_params: ModelParams::tutor_defaults(),
            grading_params: ModelParams::grading_defaults(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            backend: settings.backend(),
            prompt_builder: PromptBuilder::new(settings.compact_large_profiles),
            tutor_params: settings.tutor.clone(),
            grading_params: settings.grading.clone(),
        }
    }

    pub fn with_prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompt_builder
    }

    pub async fn send_tutor_message(
        &self,
        message: &str,
        memory: Option<&UserMemory>,
        history: &[ChatMessage],
    ) -> Result<TutorReply, AiError> {
        let provider = match &self.backend {
            Backend::Live(provider) => provider,
            Backend::Demo => {
                let reply = demo::tutor_reply(message, memory);
                return Ok(TutorReply {
                    content: reply.content,
                    tokens_used: Some(reply.tokens_used),
                    demo: true,
                });
            }
        };

        let built = self.prompt_builder.build(
            PromptRequest::new(PromptMode::Tutor, message)
                .with_memory(memory)
                .with_history(history),
        );

        info!(provider = provider.name(), "Sending tutor message");
        let response = provider
            .complete(CompletionRequest {
                messages: built.messages,
                params: self.tutor_params.clone(),
            })
            .await?;

        Ok(TutorReply {
            content: response.text,
            tokens_used: response.tokens_used,
            demo: false,
        })
    }

    pub async fn grade(
        &self,
        request: &GradingRequest,
        memory: Option<&UserMemory>,
    ) -> Result<GradingFeedback, AiError> {
        let provider = match &self.backend {
            Backend::Live(provider) => provider,
            Backend::Demo => return Ok(demo::grading_feedback(&request.answer, memory)),
        };

        let context = request.additional_context();
        let built = self.prompt_builder.build(
            PromptRequest::new(PromptMode::Grading, &request.answer)
                .with_memory(memory)
                .with_additional_context(&context),
        );

        info!(provider = provider.name(), "Requesting grading feedback");
        let response = provider
            .complete(CompletionRequest {
                messages: built.messages,
                params: self.grading_params.clone(),
            })
            .await?;

        Ok(parse_feedback(&response.text))
    }
}
