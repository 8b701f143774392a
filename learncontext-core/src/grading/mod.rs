//! Grading requests and how their outcomes feed back into learner memory.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::feedback::GradingFeedback;
use crate::memory::store::MemoryStore;
use crate::memory::UserMemory;

/// Below this percentage the question's topic is recorded as weak.
pub const WEAK_THRESHOLD_PERCENT: f64 = 60.0;
/// At or above this percentage the question's topic is recorded as strong.
pub const STRONG_THRESHOLD_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingRequest {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<String>,
}

impl GradingRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            rubric: None,
        }
    }

    pub fn with_rubric(mut self, rubric: impl Into<String>) -> Self {
        let rubric = rubric.into();
        self.rubric = (!rubric.trim().is_empty()).then_some(rubric);
        self
    }

    /// Question and optional rubric, placed ahead of the student's answer.
    pub fn additional_context(&self) -> String {
        let mut context = format!("**Question:**\n{}", self.question);
        if let Some(rubric) = &self.rubric {
            context.push_str(&format!("\n\n**Grading Rubric:**\n{rubric}"));
        }
        context
    }
}

/// The first three words of `text`, used as a topic label.
pub fn topic_label(text: &str) -> String {
    text.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}

/// Records the question's topic as weak or strong depending on the score.
/// Mid-range scores leave memory untouched.
pub fn record_grading_outcome(
    store: &MemoryStore,
    user_id: &str,
    question: &str,
    feedback: &GradingFeedback,
) -> UserMemory {
    let percent = feedback.score_percent();
    let topic = topic_label(question);

    if percent < WEAK_THRESHOLD_PERCENT {
        info!(user_id, %topic, percent, "Recording weak topic from grading");
        return store.add_weak_topic(user_id, &topic);
    }
    if percent >= STRONG_THRESHOLD_PERCENT {
        info!(user_id, %topic, percent, "Recording strong topic from grading");
        return store.add_strong_topic(user_id, &topic);
    }
    store.get(user_id)
}
