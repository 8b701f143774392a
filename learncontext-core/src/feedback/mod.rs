//! Structured grading feedback recovered from model replies.

pub mod parser;

pub use parser::parse_feedback;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCORE: u32 = 7;
pub const DEFAULT_MAX_SCORE: u32 = 10;
pub const DEFAULT_OVERALL_FEEDBACK: &str = "Good effort on this answer.";
pub const DEFAULT_STRENGTH: &str = "Shows understanding of the topic";
pub const DEFAULT_IMPROVEMENT: &str = "Consider adding more detail";
pub const DEFAULT_TIP: &str = "Keep practicing!";

/// A graded answer. Lists are never empty and the narrative is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingFeedback {
    pub score: u32,
    pub max_score: u32,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub personalized_tips: Vec<String>,
}

impl GradingFeedback {
    /// Score as a percentage of the maximum. Not clamped: a reply scoring
    /// above its own maximum yields more than 100.
    pub fn score_percent(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        f64::from(self.score) * 100.0 / f64::from(self.max_score)
    }
}

impl Default for GradingFeedback {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            overall_feedback: DEFAULT_OVERALL_FEEDBACK.to_string(),
            strengths: vec![DEFAULT_STRENGTH.to_string()],
            improvements: vec![DEFAULT_IMPROVEMENT.to_string()],
            personalized_tips: vec![DEFAULT_TIP.to_string()],
        }
    }
}
