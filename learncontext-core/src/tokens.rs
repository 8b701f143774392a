//! Rough token accounting.
//!
//! Four characters per token is close enough to decide when a profile brief
//! should be compressed. It is not suitable for billing or for enforcing a
//! context window.

const CHARS_PER_TOKEN: usize = 4;

/// Profile briefs estimated above this many tokens should be summarized.
pub const SUMMARIZATION_THRESHOLD: usize = 500;

pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
