//! Core data structures for parsed quizzes
//!
//! A `Question` is built once by the parser and never mutated afterwards;
//! fields are read through accessors so the ordinal and label invariants
//! established during parsing cannot be broken by callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Label of an option or of the correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AnswerLabel {
    /// Multiple-choice letter, always stored uppercase (A-E)
    Letter(char),
    /// "Đúng"
    True,
    /// "Sai"
    False,
}

impl AnswerLabel {
    /// Build a letter label, accepting either case
    pub fn letter(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        ('A'..='E').contains(&upper).then_some(AnswerLabel::Letter(upper))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerLabel::Letter('A') => "A",
            AnswerLabel::Letter('B') => "B",
            AnswerLabel::Letter('C') => "C",
            AnswerLabel::Letter('D') => "D",
            AnswerLabel::Letter('E') => "E",
            AnswerLabel::Letter(_) => "?",
            AnswerLabel::True => "Đúng",
            AnswerLabel::False => "Sai",
        }
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an answer label: {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for AnswerLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "đúng" => return Ok(AnswerLabel::True),
            "sai" => return Ok(AnswerLabel::False),
            _ => {}
        }

        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => AnswerLabel::letter(c).ok_or_else(|| ParseLabelError(s.to_string())),
            _ => Err(ParseLabelError(s.to_string())),
        }
    }
}

impl From<AnswerLabel> for String {
    fn from(label: AnswerLabel) -> Self {
        label.as_str().to_string()
    }
}

impl TryFrom<String> for AnswerLabel {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One answer option of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: AnswerLabel,
    pub text: String,
}

/// One parsed quiz item
///
/// Serialize-only: the parser is the one constructor, so ordinals stay
/// contiguous and option labels unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    ordinal: usize,
    statement_lines: Vec<String>,
    options: Vec<Choice>,
    correct_label: Option<AnswerLabel>,
    has_illustration_marker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    illustration_hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl Question {
    /// 1-based position in the parsed sequence
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn statement_lines(&self) -> &[String] {
        &self.statement_lines
    }

    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    pub fn correct_label(&self) -> Option<AnswerLabel> {
        self.correct_label
    }

    pub fn has_illustration_marker(&self) -> bool {
        self.has_illustration_marker
    }

    /// Extra description written next to the illustration marker, if any
    pub fn illustration_hint(&self) -> Option<&str> {
        self.illustration_hint.as_deref()
    }

    /// Lines that followed the options (explanations and other residue)
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// The option the answer marker points at, if it exists
    pub fn correct_choice(&self) -> Option<&Choice> {
        let label = self.correct_label?;
        self.options.iter().find(|choice| choice.label == label)
    }

    /// Stem text joined into a single line
    pub fn stem_text(&self) -> String {
        self.statement_lines.join(" ")
    }
}

/// Accumulates one question while the parser walks a block of lines
#[derive(Debug, Default)]
pub(crate) struct QuestionDraft {
    statement_lines: Vec<String>,
    options: Vec<Choice>,
    correct_label: Option<AnswerLabel>,
    has_illustration_marker: bool,
    illustration_hint: Option<String>,
    notes: Vec<String>,
}

impl QuestionDraft {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Unrecognised text goes to the stem until the first option, then to notes
    pub(crate) fn push_text(&mut self, line: &str) {
        if self.options.is_empty() {
            self.statement_lines.push(line.to_string());
        } else {
            self.notes.push(line.to_string());
        }
    }

    pub(crate) fn push_statement(&mut self, line: &str) {
        self.statement_lines.push(line.to_string());
    }

    /// Add an option; returns false when the label is already taken
    pub(crate) fn push_option(&mut self, label: AnswerLabel, text: &str) -> bool {
        if self.options.iter().any(|choice| choice.label == label) {
            return false;
        }
        self.options.push(Choice {
            label,
            text: text.to_string(),
        });
        true
    }

    pub(crate) fn push_note(&mut self, line: &str) {
        self.notes.push(line.to_string());
    }

    /// First marker wins; returns false if an answer was already recorded
    pub(crate) fn set_answer(&mut self, label: AnswerLabel) -> bool {
        if self.correct_label.is_some() {
            return false;
        }
        self.correct_label = Some(label);
        true
    }

    pub(crate) fn mark_illustration(&mut self, hint: Option<&str>) {
        self.has_illustration_marker = true;
        if self.illustration_hint.is_none() {
            self.illustration_hint = hint.map(str::to_string);
        }
    }

    pub(crate) fn finish(self, ordinal: usize) -> Question {
        Question {
            ordinal,
            statement_lines: self.statement_lines,
            options: self.options,
            correct_label: self.correct_label,
            has_illustration_marker: self.has_illustration_marker,
            illustration_hint: self.illustration_hint,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("b".parse::<AnswerLabel>(), Ok(AnswerLabel::Letter('B')));
        assert_eq!("ĐÚNG".parse::<AnswerLabel>(), Ok(AnswerLabel::True));
        assert_eq!("sai".parse::<AnswerLabel>(), Ok(AnswerLabel::False));
        assert!("F".parse::<AnswerLabel>().is_err());
        assert!("AB".parse::<AnswerLabel>().is_err());
    }

    #[test]
    fn test_draft_rejects_duplicate_labels() {
        let mut draft = QuestionDraft::new();
        assert!(draft.push_option(AnswerLabel::Letter('A'), "x"));
        assert!(!draft.push_option(AnswerLabel::Letter('A'), "y"));
        let question = draft.finish(1);
        assert_eq!(question.options().len(), 1);
        assert_eq!(question.options()[0].text, "x");
    }

    #[test]
    fn test_label_error_message() {
        let err = "F".parse::<AnswerLabel>().unwrap_err();
        assert_eq!(err.to_string(), "not an answer label: \"F\"");
    }

    #[test]
    fn test_label_serializes_as_display_string() {
        let json = serde_json::to_string(&AnswerLabel::True).unwrap();
        assert_eq!(json, "\"Đúng\"");
        let back: AnswerLabel = serde_json::from_str("\"c\"").unwrap();
        assert_eq!(back, AnswerLabel::Letter('C'));
    }
}
