//! Upstream text generator collaborator
//!
//! The hosted model call lives outside this crate; callers plug in an
//! implementation of `TextGenerator`. A request may name one alternate model
//! that is tried once when the primary one fails.

use thiserror::Error;
use tracing::{info, warn};

use crate::error::{QuizError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("quota exhausted: {0}")]
    Quota(String),

    #[error("model returned no text")]
    Empty,

    #[error("{0}")]
    Other(String),
}

/// Turns a composed prompt into free text
pub trait TextGenerator {
    /// Model identifier, used in logs and error messages
    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// Call `primary`, falling back to `fallback` once if it fails
///
/// Empty output counts as a failure. The error of the last attempt is
/// returned as a request-level `QuizError::Generation`.
pub fn generate_with_fallback(
    primary: &dyn TextGenerator,
    fallback: Option<&dyn TextGenerator>,
    prompt: &str,
) -> Result<String> {
    let primary_err = match attempt(primary, prompt) {
        Ok(text) => return Ok(text),
        Err(err) => err,
    };

    let Some(fallback) = fallback else {
        return Err(QuizError::Generation {
            model: primary.model().to_string(),
            message: primary_err.to_string(),
        });
    };

    warn!(
        model = primary.model(),
        fallback = fallback.model(),
        error = %primary_err,
        "primary model failed, trying fallback"
    );

    attempt(fallback, prompt).map_err(|err| QuizError::Generation {
        model: fallback.model().to_string(),
        message: format!("{err} (primary {} failed: {primary_err})", primary.model()),
    })
}

fn attempt(generator: &dyn TextGenerator, prompt: &str) -> std::result::Result<String, GenerationError> {
    let text = generator.generate(prompt)?;
    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    info!(model = generator.model(), chars = text.chars().count(), "generation succeeded");
    Ok(text)
}
