//! Learner memory: the persistent profile that personalizes every prompt.
//!
//! A `UserMemory` is owned by the `MemoryStore` and is only changed through
//! its API. Records handed out by the store are snapshots; mutating one does
//! not touch what is persisted.

pub mod bounded;
pub mod store;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::VariantArray;
use uuid::Uuid;

use bounded::Eviction;

pub const MAX_WEAK_TOPICS: usize = 10;
pub const MAX_STRONG_TOPICS: usize = 10;
pub const MAX_LEARNING_GOALS: usize = 5;
pub const MAX_RECENT_TOPICS: usize = 10;
pub const MAX_COMMON_MISTAKES: usize = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "kebab-case")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationStyle {
    Concise,
    #[default]
    StepByStep,
    ExampleDriven,
}

impl ExplanationStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::StepByStep => "step-by-step",
            Self::ExampleDriven => "example-driven",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "kebab-case")]
pub enum TonePreference {
    Formal,
    Casual,
    #[default]
    Encouraging,
}

impl TonePreference {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Encouraging => "encouraging",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "kebab-case")]
pub enum TimeAvailability {
    Limited,
    #[default]
    Moderate,
    Flexible,
}

impl TimeAvailability {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limited => "limited",
            Self::Moderate => "moderate",
            Self::Flexible => "flexible",
        }
    }
}

/// Accepts any casing and spaces in place of hyphens ("Step by step").
fn parse_variant<T: VariantArray + Copy>(
    value: &str,
    name: fn(T) -> &'static str,
    kind: &str,
) -> Result<T, String> {
    let normalized = value.trim().to_lowercase().replace([' ', '_'], "-");
    T::VARIANTS
        .iter()
        .copied()
        .find(|variant| name(*variant) == normalized)
        .ok_or_else(|| {
            let valid: Vec<&str> = T::VARIANTS.iter().map(|v| name(*v)).collect();
            format!(
                "Invalid {kind}: {value}. Valid options: {}",
                valid.join(", ")
            )
        })
}

macro_rules! display_and_parse {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                parse_variant(value, Self::as_str, $kind)
            }
        }
    };
}

display_and_parse!(SkillLevel, "skill level");
display_and_parse!(ExplanationStyle, "explanation style");
display_and_parse!(TonePreference, "tone preference");
display_and_parse!(TimeAvailability, "time availability");

/// The learning profile for a single learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub explanation_style: ExplanationStyle,
    #[serde(default)]
    pub tone_preference: TonePreference,
    #[serde(default)]
    pub time_availability: TimeAvailability,

    /// Oldest first; the oldest entry is evicted past the cap.
    #[serde(default)]
    pub weak_topics: Vec<String>,
    /// Oldest first; never shares an entry with `weak_topics`.
    #[serde(default)]
    pub strong_topics: Vec<String>,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    /// Most recent first.
    #[serde(default)]
    pub recent_topics: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,

    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub last_session_date: Option<DateTime<Utc>>,
}

impl UserMemory {
    /// Factory defaults for a learner with a freshly generated id.
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
            skill_level: SkillLevel::default(),
            explanation_style: ExplanationStyle::default(),
            tone_preference: TonePreference::default(),
            time_availability: TimeAvailability::default(),
            weak_topics: Vec::new(),
            strong_topics: Vec::new(),
            learning_goals: Vec::new(),
            recent_topics: Vec::new(),
            common_mistakes: Vec::new(),
            total_sessions: 0,
            last_session_date: None,
        }
    }

    /// Human-readable digest for dashboards and status lines.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("Skill Level: {}", self.skill_level)];

        if !self.weak_topics.is_empty() {
            parts.push(format!(
                "Areas needing work: {}",
                self.weak_topics.join(", ")
            ));
        }

        if !self.strong_topics.is_empty() {
            parts.push(format!("Strong in: {}", self.strong_topics.join(", ")));
        }

        if !self.learning_goals.is_empty() {
            parts.push(format!("Goals: {}", self.learning_goals.join(", ")));
        }

        parts.push(format!("Prefers {} explanations", self.explanation_style));
        parts.push(format!("Tone: {}", self.tone_preference));

        parts.join(". ")
    }
}

/// A partial update merged into a `UserMemory`. Identity fields (`id`,
/// `user_id`, `created_at`) are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryUpdate {
    pub skill_level: Option<SkillLevel>,
    pub explanation_style: Option<ExplanationStyle>,
    pub tone_preference: Option<TonePreference>,
    pub time_availability: Option<TimeAvailability>,
    pub weak_topics: Option<Vec<String>>,
    pub strong_topics: Option<Vec<String>>,
    pub learning_goals: Option<Vec<String>>,
    pub recent_topics: Option<Vec<String>>,
    pub common_mistakes: Option<Vec<String>>,
    pub total_sessions: Option<u32>,
    pub last_session_date: Option<DateTime<Utc>>,
}

impl MemoryUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the present fields into `memory`. Lists are normalized so the
    /// bounded-list invariants hold no matter what the caller supplied, and
    /// strong topics win over weak ones.
    pub(crate) fn apply_to(self, memory: &mut UserMemory, now: DateTime<Utc>) {
        if let Some(level) = self.skill_level {
            memory.skill_level = level;
        }
        if let Some(style) = self.explanation_style {
            memory.explanation_style = style;
        }
        if let Some(tone) = self.tone_preference {
            memory.tone_preference = tone;
        }
        if let Some(time) = self.time_availability {
            memory.time_availability = time;
        }
        if let Some(topics) = self.weak_topics {
            memory.weak_topics = bounded::normalize(topics, MAX_WEAK_TOPICS, Eviction::Oldest);
        }
        if let Some(topics) = self.strong_topics {
            memory.strong_topics =
                bounded::normalize(topics, MAX_STRONG_TOPICS, Eviction::Oldest);
        }
        if let Some(goals) = self.learning_goals {
            memory.learning_goals =
                bounded::normalize(goals, MAX_LEARNING_GOALS, Eviction::RejectNew);
        }
        if let Some(topics) = self.recent_topics {
            memory.recent_topics =
                bounded::normalize(topics, MAX_RECENT_TOPICS, Eviction::MostRecentFirst);
        }
        if let Some(mistakes) = self.common_mistakes {
            memory.common_mistakes =
                bounded::normalize(mistakes, MAX_COMMON_MISTAKES, Eviction::Oldest);
        }
        if let Some(sessions) = self.total_sessions {
            memory.total_sessions = sessions;
        }
        if let Some(date) = self.last_session_date {
            memory.last_session_date = Some(date);
        }

        let strong = &memory.strong_topics;
        memory.weak_topics.retain(|topic| !strong.contains(topic));
        memory.updated_at = now;
    }
}
