//! Illustration generation collaborator
//!
//! The renderer asks an `IllustrationGenerator` for one image per marked
//! question. Implementations report failures through `IllustrationError`;
//! the renderer turns any error into a placeholder and carries on.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// One image request, issued synchronously per marked question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationRequest {
    pub ordinal: usize,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllustrationError {
    #[error("no illustration generator configured")]
    Unavailable,

    #[error("illustration request timed out")]
    TimedOut,

    #[error("illustration generation failed: {0}")]
    Failed(String),

    #[error("illustration data is not a readable image: {0}")]
    InvalidImage(String),
}

/// Produces raw image bytes (PNG, JPEG...) for a short text prompt
///
/// Rendering calls `generate` synchronously, once per marked question, and
/// waits for it. Implementations that reach a remote service must bound each
/// call themselves and return `IllustrationError::TimedOut` when the bound
/// is hit; any error becomes a placeholder in the rendered quiz.
pub trait IllustrationGenerator {
    fn generate(&self, request: &IllustrationRequest) -> Result<Vec<u8>, IllustrationError>;
}

/// Generator used when illustrations are not wired up
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIllustrations;

impl IllustrationGenerator for NoIllustrations {
    fn generate(&self, _request: &IllustrationRequest) -> Result<Vec<u8>, IllustrationError> {
        Err(IllustrationError::Unavailable)
    }
}

/// Serves pre-made images named after the question ordinal
///
/// For question 3 the first existing file among `3.png`, `3.jpg` and
/// `3.jpeg` inside the directory is returned.
#[derive(Debug, Clone)]
pub struct DirectoryIllustrations {
    dir: PathBuf,
}

impl DirectoryIllustrations {
    const EXTENSIONS: [&'static str; 3] = ["png", "jpg", "jpeg"];

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl IllustrationGenerator for DirectoryIllustrations {
    fn generate(&self, request: &IllustrationRequest) -> Result<Vec<u8>, IllustrationError> {
        for ext in Self::EXTENSIONS {
            let path = self.dir.join(format!("{}.{ext}", request.ordinal));
            if path.is_file() {
                return fs::read(&path)
                    .map_err(|e| IllustrationError::Failed(format!("{}: {e}", path.display())));
            }
        }
        Err(IllustrationError::Failed(format!(
            "no image for question {} in {}",
            request.ordinal,
            self.dir.display()
        )))
    }
}
