//! Line classification
//!
//! Every input line is mapped to exactly one `LineKind`. Rules are tried in
//! a fixed priority order so a line that could match several patterns
//! always lands in the same bucket.

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::models::AnswerLabel;
use super::answer::{answer_region, extract_answer_token};

/// Question heading: "Câu 1.", "**Câu 2**", "CÂU 3:" and the text after it
static QUESTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[\s*_#]*câu\s*\d+\s*[*_]*\s*[.:)]?\s*[*_]*\s*(.*)$").unwrap()
});

/// "[HÌNH MINH HỌA]", accepting both tone placements of "họa"
static ILLUSTRATION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[\s*hình\s+minh\s+h(?:ọa|oạ)\s*\]").unwrap());

/// "A." / "B)" / "**C.**" at the start of a line
static OPTION_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[*_]*([A-E])[*_]*[.)][*_]*(?:\s+|$)(.*)$").unwrap());

/// A further option on the same line, separated by a wide gap
static INLINE_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s{2,}|\t)[*_]*([A-E])[*_]*[.)][*_]*\s+").unwrap());

/// Classification of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A line that is exactly `---`
    Separator,
    /// Question-start marker with the heading text that follows it
    StemLine { heading: String, illustration: bool },
    /// Illustration request, with any description written next to it
    IllustrationMarker { hint: Option<String> },
    /// Answer marker; `None` when no A-E / Đúng / Sai token could be read
    AnswerMarker(Option<AnswerLabel>),
    /// One or more options (several when laid out on one line)
    OptionLine(Vec<(AnswerLabel, String)>),
    Blank,
    Unrecognized(String),
}

/// Classify a single line of generator output
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed == "---" {
        return LineKind::Separator;
    }

    if let Some(caps) = QUESTION_START.captures(trimmed) {
        let rest = caps.get(1).map_or("", |m| m.as_str());
        let (heading, illustration) = strip_illustration_token(rest);
        return LineKind::StemLine {
            heading: clean_decoration(&heading).to_string(),
            illustration,
        };
    }

    if ILLUSTRATION_TOKEN.is_match(trimmed) {
        let (rest, _) = strip_illustration_token(trimmed);
        let hint = rest
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '*' | '_'))
            .to_string();
        return LineKind::IllustrationMarker {
            hint: (!hint.is_empty()).then_some(hint),
        };
    }

    if let Some(region) = answer_region(trimmed) {
        return LineKind::AnswerMarker(extract_answer_token(region));
    }

    if let Some(options) = split_options(trimmed) {
        return LineKind::OptionLine(options);
    }

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    LineKind::Unrecognized(trimmed.to_string())
}

/// Remove every illustration token from `text`, reporting whether one was found
fn strip_illustration_token(text: &str) -> (String, bool) {
    if !ILLUSTRATION_TOKEN.is_match(text) {
        return (text.to_string(), false);
    }
    let stripped = ILLUSTRATION_TOKEN.replace_all(text, " ");
    (stripped.split_whitespace().collect::<Vec<_>>().join(" "), true)
}

/// Trim surrounding whitespace and markdown emphasis characters
fn clean_decoration(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '_'))
}

/// Parse an option line, splitting "A. 1   B. 2   C. 3" into three options
fn split_options(line: &str) -> Option<Vec<(AnswerLabel, String)>> {
    let caps = OPTION_START.captures(line)?;
    let first_label = caps.get(1).and_then(|m| m.as_str().chars().next())?;
    let body = caps.get(2).map_or("", |m| m.as_str());

    let mut options = Vec::new();
    let mut label = AnswerLabel::letter(first_label)?;
    let mut last_letter = first_label;
    let mut segment_start = 0;

    for inline in INLINE_OPTION.captures_iter(body) {
        let (Some(whole), Some(letter)) = (inline.get(0), inline.get(1)) else {
            continue;
        };
        let Some(next_letter) = letter.as_str().chars().next() else {
            continue;
        };
        // Only split on letters that continue the sequence
        if next_letter <= last_letter {
            continue;
        }
        let Some(next_label) = AnswerLabel::letter(next_letter) else {
            continue;
        };
        options.push((label, clean_decoration(&body[segment_start..whole.start()]).to_string()));
        label = next_label;
        last_letter = next_letter;
        segment_start = whole.end();
    }

    options.push((label, clean_decoration(&body[segment_start..]).to_string()));
    Some(options)
}
