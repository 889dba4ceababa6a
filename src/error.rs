//! Error types for quiz generation and export
//!
//! Parsing never fails and illustration failures are absorbed by the
//! renderer, so these variants cover only request-level failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    /// Caller input rejected before any generator is contacted
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The upstream text generator failed (network, quota, auth...)
    #[error("generation failed ({model}): {message}")]
    Generation { model: String, message: String },

    /// Building or packing the exported document failed
    #[error("export failed: {0}")]
    Export(String),

    /// The lesson-plan source could not be turned into text
    #[error("cannot read source {path}: {reason}")]
    Source { path: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("learning objectives are required")]
    MissingObjectives,

    #[error("lesson content is missing or too short ({chars} characters, need at least {min})")]
    MissingSource { chars: usize, min: usize },

    #[error("select at least one cognitive level")]
    NoLevels,

    #[error("select at least one question type")]
    NoQuestionTypes,

    #[error("question count must be between {min} and {max}, got {got}")]
    QuestionCount { got: u32, min: u32, max: u32 },
}

impl From<toml::de::Error> for QuizError {
    fn from(err: toml::de::Error) -> Self {
        QuizError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for QuizError {
    fn from(err: toml::ser::Error) -> Self {
        QuizError::Config(err.to_string())
    }
}
