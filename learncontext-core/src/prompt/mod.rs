//! Prompt assembly.
//!
//! A prompt is the mode's base instruction, optionally followed by the
//! learner's profile brief, then the recent conversation and the new turn.
//! Rendering is deterministic and never fails: a missing profile just means
//! the base instruction is sent alone.

pub mod defaults;
pub mod profile;

pub use profile::{needs_summarization, render_profile_brief, summarize_memory};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::types::{Message, MessageRole};
use crate::chat::ChatMessage;
use crate::memory::UserMemory;
use defaults::{DIVIDER, GRADING_INSTRUCTIONS, TUTOR_INSTRUCTIONS};

/// How many prior turns accompany a request.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Tutor,
    Grading,
}

impl PromptMode {
    pub const fn base_instruction(self) -> &'static str {
        match self {
            Self::Tutor => TUTOR_INSTRUCTIONS,
            Self::Grading => GRADING_INSTRUCTIONS,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tutor => "tutor",
            Self::Grading => "grading",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tutor" => Ok(Self::Tutor),
            "grading" => Ok(Self::Grading),
            _ => Err(format!(
                "Invalid prompt mode: {value}. Valid options: tutor, grading"
            )),
        }
    }
}

/// Everything needed to render one request.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub mode: PromptMode,
    pub user_message: &'a str,
    pub memory: Option<&'a UserMemory>,
    pub history: &'a [ChatMessage],
    /// Grading context (question and rubric) placed ahead of the answer.
    pub additional_context: Option<&'a str>,
}

impl<'a> PromptRequest<'a> {
    pub fn new(mode: PromptMode, user_message: &'a str) -> Self {
        Self {
            mode,
            user_message,
            memory: None,
            history: &[],
            additional_context: None,
        }
    }

    pub fn with_memory(mut self, memory: Option<&'a UserMemory>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_history(mut self, history: &'a [ChatMessage]) -> Self {
        self.history = history;
        self
    }

    pub fn with_additional_context(mut self, context: &'a str) -> Self {
        self.additional_context = Some(context);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    /// The rendered system message, kept separately for display.
    pub system_prompt: String,
    /// System message, trimmed history, then the new user turn.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder {
    /// Swap the full brief for a one-line digest when it grows too large.
    pub compact_large_profiles: bool,
}

impl PromptBuilder {
    pub fn new(compact_large_profiles: bool) -> Self {
        Self {
            compact_large_profiles,
        }
    }

    pub fn render_system_prompt(&self, mode: PromptMode, memory: Option<&UserMemory>) -> String {
        let base = mode.base_instruction();
        let Some(memory) = memory else {
            debug!(%mode, "No learner memory; using base instruction only");
            return base.to_string();
        };

        let brief = if self.compact_large_profiles && needs_summarization(memory) {
            debug!(%mode, "Profile brief over budget; using summary");
            profile::render_compact_brief(memory)
        } else {
            render_profile_brief(memory)
        };

        format!("{base}{DIVIDER}{brief}")
    }

    pub fn build(&self, request: PromptRequest<'_>) -> BuiltPrompt {
        let system_prompt = self.render_system_prompt(request.mode, request.memory);

        let prior: Vec<&ChatMessage> = request
            .history
            .iter()
            .filter(|message| message.role != MessageRole::System)
            .collect();
        let recent = &prior[prior.len().saturating_sub(HISTORY_WINDOW)..];

        let final_turn = match request.additional_context.filter(|c| !c.trim().is_empty()) {
            Some(context) => format!(
                "{context}{DIVIDER}Student's Answer:\n{}",
                request.user_message
            ),
            None => request.user_message.to_string(),
        };

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(Message::system(system_prompt.clone()));
        messages.extend(recent.iter().map(|message| message.to_wire()));
        messages.push(Message::user(final_turn));

        debug!(
            mode = %request.mode,
            history = recent.len(),
            dropped = request.history.len() - recent.len(),
            memory_used = request.memory.is_some(),
            "Built prompt"
        );

        BuiltPrompt {
            system_prompt,
            messages,
        }
    }
}

/// Builds a prompt with the full profile brief.
pub fn build_prompt(request: PromptRequest<'_>) -> BuiltPrompt {
    PromptBuilder::default().build(request)
}
