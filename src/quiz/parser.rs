//! Response parsing
//!
//! Turns the free text returned by the generator into an ordered list of
//! `Question`s. Parsing is lenient: every input produces a result, and text
//! that fits no rule is kept as statement or note text instead of failing.

use tracing::debug;

use super::models::{Question, QuestionDraft};
use super::parsing::classify::{LineKind, classify_line};

/// Parse generator output into questions numbered 1..N in source order
///
/// Blocks start at a `Câu N` line and end at the next one, at a `---` line,
/// or at the end of input. When the text contains no question-start marker
/// at all but is not blank, the whole text becomes a single question.
pub fn parse(raw_text: &str) -> Vec<Question> {
    let questions = QuizParser::new(false).run(raw_text);
    if !questions.is_empty() || raw_text.trim().is_empty() {
        return questions;
    }

    debug!("no question-start marker found, parsing input as a single question");
    QuizParser::new(true).run(raw_text)
}

struct QuizParser {
    current: Option<QuestionDraft>,
    finished: Vec<Question>,
}

impl QuizParser {
    /// `implicit_start` opens a question before the first line is read
    fn new(implicit_start: bool) -> Self {
        Self {
            current: implicit_start.then(QuestionDraft::new),
            finished: Vec::new(),
        }
    }

    fn run(mut self, raw_text: &str) -> Vec<Question> {
        for (index, line) in raw_text.lines().enumerate() {
            self.feed(index + 1, classify_line(line));
        }
        self.close();
        self.finished
    }

    fn feed(&mut self, line_no: usize, kind: LineKind) {
        match kind {
            LineKind::Separator => self.close(),
            LineKind::StemLine {
                heading,
                illustration,
            } => {
                self.close();
                let mut draft = QuestionDraft::new();
                if !heading.is_empty() {
                    draft.push_statement(&heading);
                }
                if illustration {
                    draft.mark_illustration(None);
                }
                self.current = Some(draft);
            }
            LineKind::Blank => {}
            other => {
                let Some(draft) = self.current.as_mut() else {
                    debug!(line = line_no, kind = ?other, "ignoring line outside any question");
                    return;
                };
                apply_to_draft(draft, line_no, other);
            }
        }
    }

    fn close(&mut self) {
        if let Some(draft) = self.current.take() {
            let ordinal = self.finished.len() + 1;
            self.finished.push(draft.finish(ordinal));
        }
    }
}

fn apply_to_draft(draft: &mut QuestionDraft, line_no: usize, kind: LineKind) {
    match kind {
        LineKind::IllustrationMarker { hint } => draft.mark_illustration(hint.as_deref()),
        LineKind::AnswerMarker(Some(label)) => {
            if !draft.set_answer(label) {
                debug!(line = line_no, %label, "ignoring repeated answer marker");
            }
        }
        LineKind::AnswerMarker(None) => {
            debug!(line = line_no, "answer marker without a recognizable label");
        }
        LineKind::OptionLine(options) => {
            for (label, text) in options {
                if !draft.push_option(label, &text) {
                    debug!(line = line_no, %label, "duplicate option label kept as note");
                    draft.push_note(&format!("{label}. {text}"));
                }
            }
        }
        LineKind::Unrecognized(text) => {
            if draft.has_options() {
                debug!(line = line_no, "text after options kept as note");
            }
            draft.push_text(&text);
        }
        LineKind::Separator | LineKind::StemLine { .. } | LineKind::Blank => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::models::AnswerLabel;

    #[test]
    fn test_single_block_with_answer() {
        let questions = parse("Câu 1. Test\nA. x\nB. y\n→ Đáp án: B\n---");
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.ordinal(), 1);
        assert_eq!(q.statement_lines(), ["Test".to_string()]);
        assert_eq!(q.options().len(), 2);
        assert_eq!(q.correct_label(), Some(AnswerLabel::Letter('B')));
        assert_eq!(q.correct_choice().map(|c| c.text.as_str()), Some("y"));
    }

    #[test]
    fn test_ordinals_ignore_model_numbering() {
        let raw = "Câu 3. a\nA. 1\n\nCâu 7. b\nA. 2\n\nCâu 3. c\nA. 3";
        let ordinals: Vec<usize> = parse(raw).iter().map(Question::ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn test_multi_line_stem_and_notes() {
        let raw = "Câu 1. Cho hàm số\ny = x + 1\nGiá trị tại x = 1 là\nA. 1\nB. 2\n> **Đáp án:** B\nGiải thích: thay x = 1";
        let questions = parse(raw);
        let q = &questions[0];
        assert_eq!(q.statement_lines().len(), 3);
        assert_eq!(q.statement_lines()[1], "y = x + 1");
        assert_eq!(q.notes(), ["Giải thích: thay x = 1".to_string()]);
    }

    #[test]
    fn test_illustration_line_excluded_from_stem() {
        let questions = parse("Câu 1. Tam giác\n[HÌNH MINH HỌA]\nA. 3\nB. 4");
        let q = &questions[0];
        assert!(q.has_illustration_marker());
        assert_eq!(q.statement_lines(), ["Tam giác".to_string()]);
        assert!(q.illustration_hint().is_none());
    }

    #[test]
    fn test_orphan_preamble_is_ignored() {
        let raw = "Dưới đây là đề:\n\nCâu 1. Một\nA. x\n---\nLời kết\n";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].statement_lines(), ["Một".to_string()]);
    }

    #[test]
    fn test_text_without_markers_is_one_question() {
        let questions = parse("Chỉ là một đoạn văn\nA. có lựa chọn");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].ordinal(), 1);
        assert_eq!(questions[0].statement_lines(), ["Chỉ là một đoạn văn".to_string()]);
        assert_eq!(questions[0].options().len(), 1);
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\n\t").is_empty());
    }

    #[test]
    fn test_first_answer_marker_wins() {
        let questions = parse("Câu 1. q\nA. x\nB. y\nĐáp án: A\nĐáp án: B");
        assert_eq!(questions[0].correct_label(), Some(AnswerLabel::Letter('A')));
    }

    #[test]
    fn test_duplicate_option_becomes_note() {
        let questions = parse("Câu 1. q\nA. x\nA. again");
        let q = &questions[0];
        assert_eq!(q.options().len(), 1);
        assert_eq!(q.notes(), ["A. again".to_string()]);
    }
}
