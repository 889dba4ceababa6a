//! Answer-token extraction
//!
//! Handles the two answer-marker shapes produced by the generator:
//! `→ Đáp án: B` style lines and `@@ĐÁP ÁN: B@@` wrapped lines.

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::models::AnswerLabel;

/// Leading decoration allowed before the "Đáp án" keyword
static ANSWER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s|[*_>#=\-]|→|⇒|➜|➔)*(?i:đáp\s+án)").unwrap()
});

/// `@@ ... @@` wrapper whose inner text starts with "ĐÁP ÁN:"
static WRAPPED_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@\s*(?i:đáp\s+án)\s*:(.*?)@@$").unwrap());

/// First standalone answer token: a letter A-E or the words Đúng / Sai
static ANSWER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(đúng|sai|[a-e])\b").unwrap());

/// Token written directly after the keyword when there is no colon ("Đáp án B")
static LEADING_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s*_]*(?i:đúng|sai|[a-e])\b").unwrap());

/// Returns the text region to search for the answer token when `line` is an
/// answer marker, or `None` when it is not one.
pub(crate) fn answer_region(line: &str) -> Option<&str> {
    let trimmed = line.trim();

    if let Some(caps) = WRAPPED_ANSWER.captures(trimmed) {
        return caps.get(1).map(|m| m.as_str());
    }

    let keyword = ANSWER_PREFIX.find(trimmed)?;
    let rest = &trimmed[keyword.end()..];
    // "Đáp án đúng: B" must read B, not the word "đúng" before the colon
    match rest.find(':') {
        Some(colon) => Some(&rest[colon + 1..]),
        // Without a colon the token has to follow the keyword, otherwise the
        // line is question text such as "Đáp án nào sau đây là sai?"
        None => LEADING_TOKEN.is_match(rest).then_some(rest),
    }
}

/// Extract the first answer token from a marker region
pub(crate) fn extract_answer_token(region: &str) -> Option<AnswerLabel> {
    let caps = ANSWER_TOKEN.captures(region)?;
    caps.get(1)?.as_str().parse().ok()
}
