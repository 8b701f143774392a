use learncontext_core::feedback::GradingFeedback;
use learncontext_core::memory::UserMemory;

#[derive(Clone)]
pub struct Formatter {
    use_colors: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    fn label(&self, color: &str, label: &str) -> String {
        if self.use_colors {
            format!("\x1b[{color}m[{label}]\x1b[0m")
        } else {
            format!("[{label}]")
        }
    }

    pub fn print_system(&self, msg: &str) {
        println!("{} {msg}", self.label("33", "System"));
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{} {msg}", self.label("31", "Error"));
    }

    pub fn print_tutor(&self, msg: &str, tokens_used: Option<u32>) {
        println!("{} {msg}", self.label("32", "tutor"));
        if let Some(tokens) = tokens_used {
            println!("{}", self.dim(&format!("({tokens} tokens)")));
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[2m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn print_memory(&self, memory: &UserMemory) {
        let list = |items: &[String]| {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join(", ")
            }
        };

        println!("{} {}", self.label("36", "Profile"), memory.user_id);
        println!("  skill level:       {}", memory.skill_level);
        println!("  explanation style: {}", memory.explanation_style);
        println!("  tone:              {}", memory.tone_preference);
        println!("  time availability: {}", memory.time_availability);
        println!("  weak topics:       {}", list(&memory.weak_topics));
        println!("  strong topics:     {}", list(&memory.strong_topics));
        println!("  learning goals:    {}", list(&memory.learning_goals));
        println!("  recent topics:     {}", list(&memory.recent_topics));
        println!("  common mistakes:   {}", list(&memory.common_mistakes));
        let last_session = memory
            .last_session_date
            .map_or_else(|| "never".to_string(), |date| date.to_rfc3339());
        println!(
            "  sessions:          {} (last: {last_session})",
            memory.total_sessions
        );
        println!("{}", self.dim(&memory.describe()));
    }

    pub fn print_feedback(&self, feedback: &GradingFeedback) {
        let bullets = |items: &[String]| {
            items
                .iter()
                .map(|item| format!("  - {item}"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        println!(
            "{} {}/{} ({:.0}%)",
            self.label("32", "Score"),
            feedback.score,
            feedback.max_score,
            feedback.score_percent()
        );
        println!("\n{}", feedback.overall_feedback);
        println!("\nStrengths:\n{}", bullets(&feedback.strengths));
        println!("\nAreas for Improvement:\n{}", bullets(&feedback.improvements));
        println!("\nPersonalized Tips:\n{}", bullets(&feedback.personalized_tips));
    }
}
