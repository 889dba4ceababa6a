//! quizdoc: structured quizzes from generated text
//!
//! This library parses the free-text quiz returned by a generative model
//! into ordered questions and renders them as an HTML preview, a terminal
//! preview and a formatted Word document with the correct answer emphasised.

pub mod config;
pub mod error;
pub mod generation;
pub mod illustration;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod quiz;
pub mod render;
pub mod source;

/// What the `render` command prints to stdout
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Terminal preview with colors
    Ansi,
    /// HTML preview fragment
    Html,
    /// Parsed questions as JSON
    Json,
    /// One line per question with its answer label
    Key,
    /// Print nothing
    None,
}

/// Color depth options for ANSI export
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum ColorDepth {
    /// Auto-detect terminal color capabilities
    Auto,
    /// Monochrome (no colors)
    #[value(name = "1")]
    Monochrome,
    /// 16 colors
    #[value(name = "4")]
    Standard,
    /// 256 colors
    #[value(name = "8")]
    Extended,
    /// 24-bit true color
    #[value(name = "24")]
    TrueColor,
}

// Re-export commonly used types
pub use config::{Config, DocStyle, RenderOptions};
pub use error::{QuizError, Result, ValidationError};
pub use illustration::{DirectoryIllustrations, IllustrationGenerator, NoIllustrations};
pub use quiz::{AnswerLabel, Choice, Question, parse};
pub use render::{RenderedQuiz, render};
