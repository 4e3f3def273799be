//! Small text helpers for answer checks and model output cleanup

use std::collections::HashSet;

/// Lowercased alphanumeric words
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Number of words in `text`
pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Dice coefficient over the distinct words of two texts, in `0.0..=1.0`
///
/// Identical texts score 1.0; texts sharing no words score 0.0.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = words(a).collect();
    let b: HashSet<String> = words(b).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(&b).count();
    (2 * shared) as f64 / (a.len() + b.len()) as f64
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Keep at most `max` words, appending an ellipsis when cut
pub fn truncate_words(text: &str, max: usize) -> String {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() <= max {
        return text.trim().to_string();
    }
    format!("{}...", parts[..max].join(" "))
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
