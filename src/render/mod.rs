//! Rendering of parsed questions
//!
//! One layout pass feeds every adapter: the HTML preview, the terminal
//! preview and the exported .docx all consume the same `QuizLayout`.

pub mod ansi;
pub mod docx;
pub mod html;
pub mod layout;

use tracing::info;

use crate::config::{DocStyle, RenderOptions};
use crate::error::Result;
use crate::illustration::IllustrationGenerator;
use crate::quiz::Question;

pub use ansi::{AnsiOptions, export_to_ansi};
pub use docx::export_to_docx;
pub use html::export_to_html;
pub use layout::{Block, FormattedRun, Illustration, QuizLayout, TextFormatting, build_layout};

/// Preview markup and exported document for one quiz
#[derive(Debug, Clone)]
pub struct RenderedQuiz {
    /// HTML fragment for interactive display
    pub preview: String,
    /// .docx file contents
    pub document: Vec<u8>,
    /// The layout both outputs were produced from
    pub layout: QuizLayout,
}

/// Render `questions` into an HTML preview and a .docx document
///
/// Illustration failures are absorbed into placeholders; only building the
/// outputs themselves can fail.
pub fn render(
    questions: &[Question],
    options: &RenderOptions,
    style: &DocStyle,
    illustrations: &dyn IllustrationGenerator,
) -> Result<RenderedQuiz> {
    let layout = build_layout(questions, options, illustrations);
    let preview = export_to_html(&layout, style)?;
    let document = export_to_docx(&layout, style)?;

    info!(
        questions = questions.len(),
        emphasized = layout.emphasized_count(),
        document_bytes = document.len(),
        "quiz rendered"
    );

    Ok(RenderedQuiz {
        preview,
        document,
        layout,
    })
}
