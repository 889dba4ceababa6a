//! Read-only queries over parsed questions
//!
//! Answer-key extraction (`render --print key`) and full-text search
//! (`search`) for the command-line tool.

use serde::Serialize;

use super::models::{AnswerLabel, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerKeyEntry {
    pub ordinal: usize,
    pub label: Option<AnswerLabel>,
    /// Whether the label names one of the question's options
    pub matches_option: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub ordinal: usize,
    pub text: String,
}

pub fn answer_key(questions: &[Question]) -> Vec<AnswerKeyEntry> {
    questions
        .iter()
        .map(|question| AnswerKeyEntry {
            ordinal: question.ordinal(),
            label: question.correct_label(),
            matches_option: question.correct_choice().is_some(),
        })
        .collect()
}

/// Case-insensitive search over stems, options and notes
pub fn search_questions(questions: &[Question], query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();

    let mut hits = Vec::new();
    for question in questions {
        let texts = question
            .statement_lines()
            .iter()
            .chain(question.options().iter().map(|choice| &choice.text))
            .chain(question.notes());
        for text in texts {
            if text.to_lowercase().contains(&query_lower) {
                hits.push(SearchHit {
                    ordinal: question.ordinal(),
                    text: text.clone(),
                });
            }
        }
    }

    hits
}
