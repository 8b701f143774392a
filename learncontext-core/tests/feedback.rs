use learncontext_core::feedback::{parse_feedback, GradingFeedback};

#[test]
fn test_unstructured_text_falls_back_to_defaults() {
    let feedback = parse_feedback("no structure at all");

    assert_eq!(feedback.score, 7);
    assert_eq!(feedback.max_score, 10);
    assert!(!feedback.overall_feedback.trim().is_empty());
    assert!(!feedback.strengths.is_empty());
    assert!(!feedback.improvements.is_empty());
    assert!(!feedback.personalized_tips.is_empty());
}

#[test]
fn test_bold_score_and_strengths() {
    let feedback = parse_feedback("**Score:** 8/10\n\n**Strengths:**\n- Clear reasoning");

    assert_eq!(feedback.score, 8);
    assert_eq!(feedback.max_score, 10);
    assert_eq!(feedback.strengths, vec!["Clear reasoning"]);
}

#[test]
fn test_typical_model_reply() {
    let reply = "Thanks for your answer! Here's my assessment.

- **Score:** 6/10
- **Overall Feedback:** You identified the main causes but the explanation of the alliance system is thin. Expanding it would strengthen the argument.
- **Strengths:**
  - Correctly named the assassination as the trigger
  - Good chronological ordering
- **Areas for Improvement:**
  - Explain how the alliance system escalated the conflict
  - Mention economic rivalry between empires
- **Personalized Tips:**
  - Since you prefer step-by-step explanations, outline causes as a numbered list first
  - Revisit your notes on nationalism

Keep it up!";

    let feedback = parse_feedback(reply);
    assert_eq!(feedback.score, 6);
    assert!(feedback
        .overall_feedback
        .starts_with("You identified the main causes"));
    assert_eq!(feedback.strengths.len(), 2);
    assert_eq!(
        feedback.improvements,
        vec![
            "Explain how the alliance system escalated the conflict",
            "Mention economic rivalry between empires"
        ]
    );
    assert_eq!(
        feedback.personalized_tips,
        vec![
            "Since you prefer step-by-step explanations, outline causes as a numbered list first",
            "Revisit your notes on nationalism"
        ]
    );
    assert_eq!(feedback.score_percent(), 60.0);
}

#[test]
fn test_partial_structure_mixes_parsed_and_default() {
    let feedback = parse_feedback("Score: 4/5\nStrengths:\n- Concise");

    assert_eq!((feedback.score, feedback.max_score), (4, 5));
    assert_eq!(feedback.strengths, vec!["Concise"]);
    assert_eq!(feedback.improvements, GradingFeedback::default().improvements);
    assert_eq!(
        feedback.overall_feedback,
        GradingFeedback::default().overall_feedback
    );
}
