//! Best-effort extraction of grading feedback from free text.
//!
//! The grading instruction asks the model for labeled sections, but nothing
//! guarantees it complies. Every field falls back to a fixed default, so
//! parsing never fails.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::{
    GradingFeedback, DEFAULT_IMPROVEMENT, DEFAULT_MAX_SCORE, DEFAULT_OVERALL_FEEDBACK,
    DEFAULT_SCORE, DEFAULT_STRENGTH, DEFAULT_TIP,
};

/// Every label the grading format uses. Any of them ends the section before it.
const KNOWN_HEADINGS: &[&str] = &[
    "Score",
    "Overall Feedback",
    "Strengths",
    "Areas for Improvement",
    "Improvements",
    "Personalized Tips",
    "Tips",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    OverallFeedback,
    Strengths,
    Improvements,
    Tips,
}

impl Section {
    /// Primary name first, then fallbacks.
    const fn names(self) -> &'static [&'static str] {
        match self {
            Self::OverallFeedback => &["Overall Feedback"],
            Self::Strengths => &["Strengths"],
            Self::Improvements => &["Areas for Improvement", "Improvements"],
            Self::Tips => &["Personalized Tips", "Tips"],
        }
    }
}

/// Matches a label written as `**Name:**`, `**Name**:`, `## Name` or a bare
/// `Name:`, always at the start of a line. A leading list marker belongs to
/// the match so it never leaks into the previous section. Bold words inside a
/// sentence are emphasis, not labels.
fn heading_pattern(names: &[&str]) -> String {
    let names = names
        .iter()
        .map(|name| regex::escape(name).replace(' ', r"[ \t]+"))
        .collect::<Vec<_>>()
        .join("|");
    format!(
        r"(?im)^[ \t]*(?:[-•+*][ \t]*)?(?:(?:\*\*|__)[ \t]*(?:{names})[ \t]*(?::[ \t]*(?:\*\*|__)|(?:\*\*|__)[ \t]*:?)|#{{1,6}}[ \t]*(?:{names})[ \t]*:?[ \t]*$|(?:{names})[ \t]*:)"
    )
}

/// `heading` is set when the score opens its own line, as a label does.
fn score_regex() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?im)(?P<heading>^[ \t]*(?:[-•+*][ \t]*)?(?:#{1,6}[ \t]*)?(?:\*\*|__)?[ \t]*)?\bscore[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?[ \t]*(?P<score>\d+)[ \t]*/[ \t]*(?P<max>\d+)")
            .expect("Valid score regex")
    });
    &PATTERN
}

/// Any label, any markdown heading, or a horizontal rule.
fn boundary_regex() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        let pattern = format!(
            r"{}|(?m)^[ \t]*#{{1,6}}[ \t]+\S|(?m)^[ \t]*(?:-{{3,}}|\*{{3,}}|_{{3,}})[ \t]*$",
            heading_pattern(KNOWN_HEADINGS)
        );
        Regex::new(&pattern).expect("Valid section boundary regex")
    });
    &PATTERN
}

fn heading_regex(name: &str) -> Option<&'static Regex> {
    static PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
        KNOWN_HEADINGS
            .iter()
            .map(|name| {
                let regex =
                    Regex::new(&heading_pattern(&[*name])).expect("Valid section heading regex");
                (*name, regex)
            })
            .collect()
    });
    PATTERNS.get(name)
}

/// The first `score/max` pair with a positive maximum, preferring one that
/// opens a line over one mentioned in passing.
fn extract_score(text: &str) -> Option<(u32, u32)> {
    let candidates = || {
        score_regex().captures_iter(text).filter_map(|captures| {
            let score = captures["score"].parse::<u32>().ok()?;
            let max_score = captures["max"].parse::<u32>().ok()?;
            let heading = captures.name("heading").is_some();
            (max_score > 0).then_some((heading, (score, max_score)))
        })
    };

    candidates()
        .find(|(heading, _)| *heading)
        .or_else(|| candidates().next())
        .map(|(_, pair)| pair)
}

/// Body text from `start` up to the next boundary.
fn section_body(text: &str, start: usize) -> &str {
    let end = boundary_regex()
        .find_at(text, start)
        .map_or(text.len(), |boundary| boundary.start());
    text[start..end].trim()
}

/// Non-empty bodies under every occurrence of the primary name, then of
/// each fallback.
fn section_bodies(text: &str, section: Section) -> impl Iterator<Item = &str> {
    section
        .names()
        .iter()
        .filter_map(|name| heading_regex(name))
        .flat_map(move |heading| {
            heading
                .find_iter(text)
                .map(move |found| section_body(text, found.end()))
        })
        .filter(|body| !body.is_empty())
}

fn strip_bullet(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let item = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| line.strip_prefix('+'))
        .or_else(|| line.strip_prefix("* "))?;
    let item = item.trim();
    let rule = item
        .chars()
        .all(|c| matches!(c, '-' | '*' | '_') || c.is_whitespace());
    (!rule).then_some(item)
}

/// Bullets from the first section body that has any.
fn extract_bullets(text: &str, section: Section) -> Vec<String> {
    section_bodies(text, section)
        .map(|body| {
            body.lines()
                .filter_map(strip_bullet)
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn or_default(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}

/// Parses a grading reply. Never fails; missing pieces get defaults.
pub fn parse_feedback(text: &str) -> GradingFeedback {
    let (score, max_score) = extract_score(text).unwrap_or_else(|| {
        debug!("No score found in grading reply; using default");
        (DEFAULT_SCORE, DEFAULT_MAX_SCORE)
    });
    if score > max_score {
        warn!(score, max_score, "Grading reply scored above its maximum");
    }

    let overall_feedback = section_bodies(text, Section::OverallFeedback)
        .next()
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_OVERALL_FEEDBACK.to_string());

    GradingFeedback {
        score,
        max_score,
        overall_feedback,
        strengths: or_default(extract_bullets(text, Section::Strengths), DEFAULT_STRENGTH),
        improvements: or_default(
            extract_bullets(text, Section::Improvements),
            DEFAULT_IMPROVEMENT,
        ),
        personalized_tips: or_default(extract_bullets(text, Section::Tips), DEFAULT_TIP),
    }
}
