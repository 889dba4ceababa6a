//! End-to-end quiz generation
//!
//! validate -> compose prompt -> generate -> parse -> render. The pipeline
//! holds only borrowed collaborators and configuration; each `run` is an
//! independent request with no state carried between calls.

use tracing::{info, info_span};

use crate::config::{DocStyle, RenderOptions};
use crate::error::Result;
use crate::generation::{TextGenerator, generate_with_fallback};
use crate::illustration::IllustrationGenerator;
use crate::prompt::QuizRequest;
use crate::quiz::{Question, parse};
use crate::render::{RenderedQuiz, render};

pub struct QuizPipeline<'a> {
    pub generator: &'a dyn TextGenerator,
    pub fallback: Option<&'a dyn TextGenerator>,
    pub illustrations: &'a dyn IllustrationGenerator,
    pub options: &'a RenderOptions,
    pub style: &'a DocStyle,
}

/// Everything produced for one request
#[derive(Debug, Clone)]
pub struct QuizOutput {
    pub raw_text: String,
    pub questions: Vec<Question>,
    pub rendered: RenderedQuiz,
}

impl QuizPipeline<'_> {
    pub fn run(&self, request: &QuizRequest) -> Result<QuizOutput> {
        let span = info_span!("quiz_request", questions = request.question_count);
        let _guard = span.enter();

        // Fails before the generator is contacted
        let prompt = request.compose_prompt()?;
        let raw_text = generate_with_fallback(self.generator, self.fallback, &prompt)?;

        let questions = parse(&raw_text);
        info!(
            requested = request.question_count,
            parsed = questions.len(),
            "generator output parsed"
        );

        let rendered = render(&questions, self.options, self.style, self.illustrations)?;

        Ok(QuizOutput {
            raw_text,
            questions,
            rendered,
        })
    }
}
