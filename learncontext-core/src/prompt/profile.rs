//! Renders a learner profile into prompt text.

use super::defaults::{skill_description, style_guidance, time_guidance, tone_guidance};
use crate::memory::UserMemory;
use crate::tokens::{estimate_tokens, SUMMARIZATION_THRESHOLD};

const PROFILE_HEADING: &str = "## Student Learning Profile";
const SUMMARY_HEADING: &str = "## Student Learning Profile (Summary)";
const RECENT_TOPICS_SHOWN: usize = 3;

/// The full profile brief. Clauses whose source list is empty are left out
/// entirely.
pub fn render_profile_brief(memory: &UserMemory) -> String {
    let mut clauses = vec![
        PROFILE_HEADING.to_string(),
        format!(
            "Skill Level: This student is {}.",
            skill_description(memory.skill_level)
        ),
        format!(
            "Preferred Style: {}",
            style_guidance(memory.explanation_style)
        ),
        format!("Tone: {}", tone_guidance(memory.tone_preference)),
    ];

    if !memory.weak_topics.is_empty() {
        clauses.push(format!(
            "Known Challenges: {}. The student has struggled with these topics, so approach them with extra care and scaffolding.",
            memory.weak_topics.join(", ")
        ));
    }

    if !memory.strong_topics.is_empty() {
        clauses.push(format!(
            "Strengths: {}. The student is confident here; reference these as foundations for new concepts.",
            memory.strong_topics.join(", ")
        ));
    }

    if !memory.learning_goals.is_empty() {
        clauses.push(format!(
            "Current Goals: {}. Connect lessons to these goals when possible.",
            memory.learning_goals.join(", ")
        ));
    }

    if !memory.common_mistakes.is_empty() {
        clauses.push(format!(
            "Patterns to Address: {}. The student has made these mistakes before; watch for them and provide proactive guidance.",
            memory.common_mistakes.join(", ")
        ));
    }

    clauses.push(format!(
        "Time Availability: {}",
        time_guidance(memory.time_availability)
    ));

    if memory.total_sessions > 0 {
        let mut history = format!(
            "Session History: This is approximately session #{} with this student.",
            u64::from(memory.total_sessions) + 1
        );
        if !memory.recent_topics.is_empty() {
            let recent: Vec<&str> = memory
                .recent_topics
                .iter()
                .take(RECENT_TOPICS_SHOWN)
                .map(String::as_str)
                .collect();
            history.push_str(&format!(" Recent topics covered: {}.", recent.join(", ")));
        }
        clauses.push(history);
    }

    clauses.join("\n\n")
}

/// A one-line digest for contexts that need the profile compressed.
pub fn summarize_memory(memory: &UserMemory) -> String {
    let mut parts = vec![
        format!("{} level student", memory.skill_level),
        format!("prefers {} explanations", memory.explanation_style),
        format!("{} tone", memory.tone_preference),
    ];

    if !memory.weak_topics.is_empty() {
        let topics: Vec<&str> = memory.weak_topics.iter().take(3).map(String::as_str).collect();
        parts.push(format!("struggles with: {}", topics.join(", ")));
    }

    if !memory.learning_goals.is_empty() {
        let goals: Vec<&str> = memory
            .learning_goals
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        parts.push(format!("goals: {}", goals.join(", ")));
    }

    parts.join("; ")
}

pub fn render_compact_brief(memory: &UserMemory) -> String {
    format!("{SUMMARY_HEADING}\n\n{}", summarize_memory(memory))
}

pub fn needs_summarization(memory: &UserMemory) -> bool {
    estimate_tokens(&render_profile_brief(memory)) > SUMMARIZATION_THRESHOLD
}
