mod fixture;

use fixture::{memory_with, numbered_history};
use learncontext_core::ai::types::{Message, MessageRole};
use learncontext_core::chat::ChatMessage;
use learncontext_core::memory::{ExplanationStyle, SkillLevel};
use learncontext_core::prompt::{build_prompt, PromptMode, PromptRequest};

#[test]
fn test_empty_lists_omit_their_clauses() {
    let memory = memory_with(|_| {});

    for mode in [PromptMode::Tutor, PromptMode::Grading] {
        let built = build_prompt(PromptRequest::new(mode, "hello").with_memory(Some(&memory)));
        // The grading instruction names its own Strengths section.
        let brief = built
            .system_prompt
            .strip_prefix(mode.base_instruction())
            .unwrap();
        for label in [
            "Known Challenges",
            "Strengths",
            "Current Goals",
            "Patterns to Address",
        ] {
            assert!(!brief.contains(label), "{mode} brief unexpectedly contains {label}");
        }
        assert!(brief.contains("Time Availability:"));
    }

    let tutor = build_prompt(PromptRequest::new(PromptMode::Tutor, "hello").with_memory(Some(&memory)));
    assert!(!tutor.system_prompt.contains("Strengths"));
}

#[test]
fn test_history_truncated_to_last_ten() {
    let history = numbered_history(15);
    let built = build_prompt(PromptRequest::new(PromptMode::Tutor, "next").with_history(&history));

    assert_eq!(built.messages.len(), 12);
    assert_eq!(built.messages[0].role, MessageRole::System);

    let carried: Vec<&str> = built.messages[1..11]
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    let expected: Vec<String> = (5..15).map(|i| format!("message {i}")).collect();
    assert_eq!(carried, expected);

    assert_eq!(built.messages[11], Message::user("next"));
}

#[test]
fn test_history_system_messages_filtered_before_window() {
    let mut history = numbered_history(10);
    history.insert(3, ChatMessage::system("stale instruction"));
    history.push(ChatMessage::system("another"));

    let built = build_prompt(PromptRequest::new(PromptMode::Tutor, "next").with_history(&history));

    let system_count = built
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .count();
    assert_eq!(system_count, 1);
    assert_eq!(built.messages.len(), 12);
    assert_eq!(built.messages[1].content, "message 0");
}

#[test]
fn test_advanced_concise_learner_end_to_end() {
    let memory = memory_with(|memory| {
        memory.skill_level = SkillLevel::Advanced;
        memory.explanation_style = ExplanationStyle::Concise;
        memory.weak_topics = vec!["integration by parts".to_string()];
    });

    let built = build_prompt(
        PromptRequest::new(PromptMode::Tutor, "explain entropy")
            .with_memory(Some(&memory))
            .with_history(&[]),
    );

    assert_eq!(built.messages.len(), 2);
    assert_eq!(built.messages[0].role, MessageRole::System);
    assert_eq!(built.messages[1].role, MessageRole::User);
    assert_eq!(built.messages[1].content, "explain entropy");

    let system = &built.messages[0].content;
    assert!(system.contains(
        "an advanced student who appreciates depth, nuance, and intellectual challenge"
    ));
    assert!(system.contains(
        "Be brief and direct. Get to the key points quickly without unnecessary elaboration."
    ));
    assert!(system.contains("Known Challenges: integration by parts"));
    assert_eq!(system, &built.system_prompt);
}

#[test]
fn test_grading_prompt_mandates_sections() {
    let built = build_prompt(
        PromptRequest::new(PromptMode::Grading, "It is 4").with_additional_context("**Question:**\n2+2?"),
    );

    for section in [
        "**Score:**",
        "**Overall Feedback:**",
        "**Strengths:**",
        "**Areas for Improvement:**",
        "**Personalized Tips:**",
    ] {
        assert!(built.system_prompt.contains(section));
    }
    assert!(built.messages[1].content.ends_with("Student's Answer:\nIt is 4"));
}
