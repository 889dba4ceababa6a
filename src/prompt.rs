//! Quiz request validation and prompt composition
//!
//! The form collects objectives, lesson content, cognitive levels, question
//! types and a question count. Requests are validated before any generator
//! is contacted; the prompt spells out the output format `quiz::parse`
//! understands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::error::{Result, ValidationError};

/// Lesson content shorter than this is treated as unreadable
pub const MIN_SOURCE_CHARS: usize = 100;
/// Lesson content beyond this many characters is cut off
pub const MAX_SOURCE_CHARS: usize = 30_000;
pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 30;
pub const DEFAULT_QUESTIONS: u32 = 12;

/// Cognitive levels offered by the form
pub const LEVELS: [&str; 3] = ["Biết", "Hiểu", "Vận dụng"];

/// Question types offered by the form
pub const QUESTION_TYPES: [&str; 3] = [
    "4 đáp án (1 đúng)",
    "Đúng - Sai",
    "Nhiều lựa chọn đúng (Chọn nhiều trong 5)",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub objectives: String,
    pub source_text: String,
    pub level_tags: BTreeSet<String>,
    pub question_type_tags: BTreeSet<String>,
    pub question_count: u32,
}

impl QuizRequest {
    /// Reject incomplete requests; the first problem found is reported
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.objectives.trim().is_empty() {
            return Err(ValidationError::MissingObjectives);
        }

        let chars = self.source_text.trim().chars().count();
        if chars < MIN_SOURCE_CHARS {
            return Err(ValidationError::MissingSource {
                chars,
                min: MIN_SOURCE_CHARS,
            });
        }

        if self.level_tags.iter().all(|tag| tag.trim().is_empty()) {
            return Err(ValidationError::NoLevels);
        }
        if self.question_type_tags.iter().all(|tag| tag.trim().is_empty()) {
            return Err(ValidationError::NoQuestionTypes);
        }

        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(ValidationError::QuestionCount {
                got: self.question_count,
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }

        Ok(())
    }

    /// Validate, then build the prompt text sent to the generator
    pub fn compose_prompt(&self) -> Result<String> {
        self.validate()?;

        let source: String = self.source_text.trim().chars().take(MAX_SOURCE_CHARS).collect();
        let levels = join_tags(&self.level_tags);
        let types = join_tags(&self.question_type_tags);

        let mut prompt = String::new();
        writeln!(prompt, "Bạn là giáo viên giỏi chuyên soạn đề trắc nghiệm.")?;
        writeln!(
            prompt,
            "Hãy tạo đúng {} câu hỏi dựa trên:\n",
            self.question_count
        )?;
        writeln!(prompt, "YÊU CẦU CẦN ĐẠT (phải bám sát 100%):")?;
        writeln!(prompt, "{}\n", self.objectives.trim())?;
        writeln!(prompt, "NỘI DUNG GIÁO ÁN:")?;
        writeln!(prompt, "{source}\n")?;
        writeln!(prompt, "YÊU CẦU:")?;
        writeln!(prompt, "- Mức độ: {levels}")?;
        writeln!(prompt, "- Loại câu hỏi: {types}\n")?;
        writeln!(prompt, "ĐỊNH DẠNG BẮT BUỘC, mỗi câu cách nhau bằng một dòng ---")?;
        writeln!(prompt, "Mỗi lựa chọn nằm trên một dòng riêng.")?;
        writeln!(
            prompt,
            "Nếu câu hỏi cần hình vẽ, thêm một dòng [HÌNH MINH HỌA] kèm mô tả ngắn."
        )?;
        writeln!(prompt, "Ví dụ:")?;
        writeln!(prompt, "Câu 1. [Mức độ: Hiểu - Loại: 4 đáp án] Nội dung câu hỏi...")?;
        writeln!(prompt, "A. ...\nB. ...\nC. ...\nD. ...")?;
        writeln!(prompt, "→ Đáp án: B")?;
        writeln!(prompt, "Giải thích: ...")?;
        writeln!(prompt, "---")?;
        writeln!(
            prompt,
            "Với câu Đúng - Sai, ghi đáp án là \"→ Đáp án: Đúng\" hoặc \"→ Đáp án: Sai\"."
        )?;

        Ok(prompt)
    }
}

fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
