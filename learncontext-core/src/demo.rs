//! Locally synthesized replies used when no model provider is configured.
//!
//! Output is canned text keyed by topic keywords and the learner's profile.
//! It keeps the tutor and grading flows usable offline and in demos.

use crate::feedback::GradingFeedback;
use crate::memory::{ExplanationStyle, SkillLevel, TonePreference, UserMemory};

const DEMO_NOTE: &str = "*Note: This is a demo response. Configure an AI provider with `learncontext provider set-openai` for personalized tutoring.*";
const DEMO_GRADING_TIP: &str =
    "*Demo mode: configure an AI provider for real AI grading*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoTopic {
    Math,
    History,
    Science,
    General,
}

impl DemoTopic {
    fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if mentions(&["math", "equation", "calcul"]) {
            Self::Math
        } else if mentions(&["history", "war", "revolution"]) {
            Self::History
        } else if mentions(&["science", "physics", "chemistry"]) {
            Self::Science
        } else {
            Self::General
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReply {
    pub content: String,
    pub tokens_used: u32,
}

pub fn tutor_reply(message: &str, memory: Option<&UserMemory>) -> DemoReply {
    let skill = memory.map_or(SkillLevel::Intermediate, |m| m.skill_level);
    let style = memory.map_or(ExplanationStyle::StepByStep, |m| m.explanation_style);

    let mut content = String::new();
    if memory.is_some_and(|m| m.tone_preference == TonePreference::Encouraging) {
        content.push_str("Great question! I'm happy to help you understand this better. ");
    }

    content.push_str(&match DemoTopic::detect(message) {
        DemoTopic::Math => math_reply(skill, style),
        DemoTopic::History => history_reply(skill, style),
        DemoTopic::Science => science_reply(skill, style),
        DemoTopic::General => general_reply(skill, style),
    });

    if let Some(topic) = memory.and_then(|m| m.weak_topics.first()) {
        content.push_str(&format!(
            "\n\n*I notice you've been working on {topic}. Would you like me to connect this to that topic?*"
        ));
    }

    let tokens_used = u32::try_from(content.chars().count() / 4).unwrap_or(u32::MAX);
    DemoReply {
        content,
        tokens_used,
    }
}

fn math_reply(skill: SkillLevel, style: ExplanationStyle) -> String {
    match style {
        ExplanationStyle::StepByStep => {
            let closing = if skill == SkillLevel::Beginner {
                "Remember, take your time with each step. There's no rush!"
            } else {
                "Try to identify patterns as you work through similar problems."
            };
            format!(
                "Let me break this down for you:\n\n\
                 **Step 1:** First, identify what type of problem this is\n\
                 **Step 2:** Write out the given information\n\
                 **Step 3:** Apply the relevant formula or method\n\
                 **Step 4:** Solve step by step, showing your work\n\
                 **Step 5:** Check your answer\n\n{closing}"
            )
        }
        ExplanationStyle::ExampleDriven => {
            let closing = if skill == SkillLevel::Advanced {
                "You can extend this to more complex scenarios like matrices or vector spaces."
            } else {
                "Does this analogy help clarify the concept?"
            };
            format!(
                "Here's how this works with a concrete example:\n\n\
                 **Example:** Imagine you have 3 baskets with 5 apples each...\n\n\
                 This is just like the mathematical concept you're asking about. \
                 The pattern here is multiplication: 3 x 5 = 15 apples total.\n\n{closing}"
            )
        }
        ExplanationStyle::Concise => "The key to understanding this mathematical concept is practice and pattern recognition. Would you like me to work through an example together?".to_string(),
    }
}

fn history_reply(skill: SkillLevel, style: ExplanationStyle) -> String {
    if style != ExplanationStyle::StepByStep {
        return "History is all about understanding cause and effect, and how events connect across time. Let me help you see these connections more clearly.".to_string();
    }

    let closing = if skill == SkillLevel::Beginner {
        "Understanding history is like piecing together a story. Each event connects to the next."
    } else {
        "Consider how primary sources might give us different perspectives on these events."
    };
    format!(
        "Let's analyze this historical event systematically:\n\n\
         **1. Context:** What was happening before this event?\n\
         **2. Causes:** What led to this happening?\n\
         **3. Key Players:** Who were the important figures involved?\n\
         **4. Events:** What actually happened?\n\
         **5. Consequences:** What changed as a result?\n\n{closing}"
    )
}

fn science_reply(skill: SkillLevel, style: ExplanationStyle) -> String {
    if style != ExplanationStyle::ExampleDriven {
        return "Science is about observation, hypothesis, and testing. Let's explore this concept together and see how it connects to what you already know.".to_string();
    }

    let closing = if skill == SkillLevel::Advanced {
        "The underlying physics involves wave interference and the electromagnetic spectrum."
    } else {
        "Would you like me to explain the simple version first?"
    };
    format!(
        "Let me explain this with a real-world example:\n\n\
         **Everyday Example:** Think about when you see a rainbow after rain...\n\n\
         This demonstrates the scientific principle at work. Light behaves in predictable ways, \
         and understanding these patterns helps us understand our world.\n\n{closing}"
    )
}

fn general_reply(skill: SkillLevel, style: ExplanationStyle) -> String {
    let opening = if style == ExplanationStyle::StepByStep {
        "Let's break this down into manageable parts:"
    } else {
        "Here's the key concept:"
    };
    let depth = match skill {
        SkillLevel::Beginner => "I'll start with the fundamentals and we can build from there.",
        SkillLevel::Intermediate => {
            "I'll give you a balanced explanation with room to explore deeper."
        }
        SkillLevel::Advanced => "Given your level, let's dive into the nuances of this topic.",
    };
    format!(
        "That's an interesting topic! Let me help you understand it better.\n\n\
         {opening}\n\n{depth}\n\n\
         Would you like me to explain any specific aspect in more detail?\n\n---\n{DEMO_NOTE}"
    )
}

/// Length-based score capped at 8/10, with profile-flavored comments.
pub fn grading_feedback(answer: &str, memory: Option<&UserMemory>) -> GradingFeedback {
    let length = answer.chars().count();
    let score = u32::try_from(length / 50).map_or(8, |bonus| bonus.saturating_add(3).min(8));

    let encouraging = memory.is_some_and(|m| m.tone_preference == TonePreference::Encouraging);
    let overall_feedback = if encouraging {
        "Good effort on this response! You're making great progress!"
    } else {
        "Good effort on this response! Let's look at how to improve."
    };

    let detail = if length > 100 {
        "Provided a detailed response"
    } else {
        "Got to the point efficiently"
    };

    let watch_for = memory
        .and_then(|m| m.weak_topics.first())
        .map_or_else(
            || "Double-check your reasoning".to_string(),
            |topic| format!("Watch for common mistakes in {topic}"),
        );

    let step_by_step = memory.is_some_and(|m| m.explanation_style == ExplanationStyle::StepByStep);
    let organize = if step_by_step {
        "Try organizing your answer in clear steps"
    } else {
        "Use concrete examples to support your points"
    };

    let beginner = memory.is_some_and(|m| m.skill_level == SkillLevel::Beginner);
    let depth = if beginner {
        "Focus on understanding the basics first"
    } else {
        "Push yourself to explore deeper connections"
    };

    GradingFeedback {
        score,
        max_score: 10,
        overall_feedback: overall_feedback.to_string(),
        strengths: vec![
            "Attempted to address the question directly".to_string(),
            "Shows engagement with the material".to_string(),
            detail.to_string(),
        ],
        improvements: vec![
            "Consider adding more specific examples".to_string(),
            "Try to connect your answer to broader concepts".to_string(),
            watch_for,
        ],
        personalized_tips: vec![
            organize.to_string(),
            depth.to_string(),
            DEMO_GRADING_TIP.to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case("Help me solve this equation", DemoTopic::Math)]
    #[case("What caused the French Revolution?", DemoTopic::History)]
    #[case("I love chemistry", DemoTopic::Science)]
    #[case("Tell me about poetry", DemoTopic::General)]
    fn test_topic_detection(#[case] message: &str, #[case] expected: DemoTopic) {
        assert_eq!(DemoTopic::detect(message), expected);
    }

    #[test]
    fn test_tutor_reply_without_memory_uses_intermediate_step_by_step() {
        let reply = tutor_reply("Tell me about poetry", None);
        assert!(reply.content.starts_with("That's an interesting topic!"));
        assert!(reply.content.contains("Let's break this down into manageable parts:"));
        assert!(reply.content.contains("balanced explanation"));
        assert_eq!(reply.tokens_used as usize, reply.content.chars().count() / 4);
    }

    #[test]
    fn test_tutor_reply_personalized() {
        let mut memory = UserMemory::new("alice", Utc::now());
        memory.weak_topics = vec!["fractions".to_string()];

        let reply = tutor_reply("math homework", Some(&memory));
        assert!(reply.content.starts_with("Great question!"));
        assert!(reply.content.contains("**Step 1:**"));
        assert!(reply.content.contains("There's no rush!"));
        assert!(reply.content.contains("working on fractions"));
    }

    #[rstest]
    #[case(0, 3)]
    #[case(49, 3)]
    #[case(100, 5)]
    #[case(250, 8)]
    #[case(5000, 8)]
    fn test_grading_score_from_length(#[case] length: usize, #[case] expected: u32) {
        let feedback = grading_feedback(&"a".repeat(length), None);
        assert_eq!(feedback.score, expected);
        assert_eq!(feedback.max_score, 10);
        assert_eq!(feedback.strengths.len(), 3);
    }

    #[test]
    fn test_grading_feedback_uses_profile() {
        let mut memory = UserMemory::new("alice", Utc::now());
        memory.weak_topics = vec!["limits".to_string()];

        let feedback = grading_feedback("short", Some(&memory));
        assert!(feedback.overall_feedback.contains("great progress"));
        assert_eq!(feedback.improvements[2], "Watch for common mistakes in limits");
        assert_eq!(
            feedback.personalized_tips[0],
            "Try organizing your answer in clear steps"
        );
        assert_eq!(
            feedback.personalized_tips[1],
            "Focus on understanding the basics first"
        );
    }
}
