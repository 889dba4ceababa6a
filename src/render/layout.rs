//! Adapter-independent layout
//!
//! Applies the per-question rendering rules once (stem, illustration,
//! options with emphasis, separators) and produces a flat list of blocks.
//! Every output adapter walks the same `QuizLayout`, so the HTML preview and
//! the exported document cannot disagree about content or emphasis.

use serde::Serialize;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::config::RenderOptions;
use crate::illustration::{IllustrationError, IllustrationGenerator, IllustrationRequest};
use crate::quiz::{AnswerLabel, Question};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextFormatting {
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRun {
    pub text: String,
    pub formatting: TextFormatting,
}

impl FormattedRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: TextFormatting::default(),
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: TextFormatting {
                bold: true,
                italic: false,
            },
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: TextFormatting {
                bold: false,
                italic: true,
            },
        }
    }

    /// Consolidate adjacent runs with identical formatting into single runs
    pub fn consolidate_runs(runs: Vec<FormattedRun>) -> Vec<FormattedRun> {
        let mut consolidated: Vec<FormattedRun> = Vec::with_capacity(runs.len());

        for run in runs {
            match consolidated.last_mut() {
                Some(last) if last.formatting == run.formatting => last.text.push_str(&run.text),
                _ => consolidated.push(run),
            }
        }

        consolidated
    }
}

/// Result of an illustration request
#[derive(Clone, PartialEq, Eq, Serialize)]
pub enum Illustration {
    /// Decoded image, re-encoded as PNG
    Image { png: Vec<u8>, width: u32, height: u32 },
    /// Text shown instead of a failed illustration
    Placeholder(String),
}

impl std::fmt::Debug for Illustration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Illustration::Image { png, width, height } => f
                .debug_struct("Image")
                .field("bytes", &png.len())
                .field("width", width)
                .field("height", height)
                .finish(),
            Illustration::Placeholder(text) => f.debug_tuple("Placeholder").field(text).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    Title(String),
    /// Stem lines and notes
    Paragraph { runs: Vec<FormattedRun> },
    Illustration {
        ordinal: usize,
        illustration: Illustration,
    },
    Choice {
        label: AnswerLabel,
        text: String,
        emphasized: bool,
    },
    /// Gap between two questions
    Separator,
    /// Page break between two questions (paginated targets only)
    PageBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizLayout {
    pub blocks: Vec<Block>,
}

impl QuizLayout {
    /// Number of options rendered with emphasis
    pub fn emphasized_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| matches!(block, Block::Choice { emphasized: true, .. }))
            .count()
    }
}

/// Lay out `questions` according to `options`
///
/// Illustrations are requested synchronously, one per marked question; a
/// failed request becomes a placeholder block and layout continues.
pub fn build_layout(
    questions: &[Question],
    options: &RenderOptions,
    illustrations: &dyn IllustrationGenerator,
) -> QuizLayout {
    let mut blocks = Vec::new();

    if let Some(title) = options.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        blocks.push(Block::Title(title.to_string()));
    }

    let page_break_interval = options.page_break_interval();

    for (index, question) in questions.iter().enumerate() {
        if index > 0 {
            let page_break = page_break_interval.is_some_and(|n| index % n == 0);
            blocks.push(if page_break {
                Block::PageBreak
            } else {
                Block::Separator
            });
        }

        push_stem(&mut blocks, question);

        if question.has_illustration_marker() && options.include_illustrations {
            blocks.push(Block::Illustration {
                ordinal: question.ordinal(),
                illustration: fetch_illustration(question, illustrations),
            });
        }

        let emphasized = emphasized_label(question, options);
        for choice in question.options() {
            blocks.push(Block::Choice {
                label: choice.label,
                text: choice.text.clone(),
                emphasized: emphasized == Some(choice.label),
            });
        }

        if options.include_notes {
            for note in question.notes() {
                blocks.push(Block::Paragraph {
                    runs: vec![FormattedRun::italic(note.as_str())],
                });
            }
        }
    }

    QuizLayout { blocks }
}

/// Heading line in bold ("Câu N. text"), continuation lines in normal weight
fn push_stem(blocks: &mut Vec<Block>, question: &Question) {
    let mut lines = question.statement_lines().iter();

    let mut heading = vec![FormattedRun::bold(format!("Câu {}.", question.ordinal()))];
    if let Some(first) = lines.next() {
        heading.push(FormattedRun::bold(format!(" {first}")));
    }
    blocks.push(Block::Paragraph {
        runs: FormattedRun::consolidate_runs(heading),
    });

    for line in lines {
        blocks.push(Block::Paragraph {
            runs: vec![FormattedRun::plain(line.as_str())],
        });
    }
}

fn emphasized_label(question: &Question, options: &RenderOptions) -> Option<AnswerLabel> {
    if !options.highlight_correct_answer {
        return None;
    }
    let label = question.correct_label()?;
    match question.correct_choice() {
        Some(choice) => Some(choice.label),
        None => {
            debug!(
                ordinal = question.ordinal(),
                %label,
                "answer label matches no option, rendering without emphasis"
            );
            None
        }
    }
}

/// Prompt sent to the illustration generator for a marked question
pub fn illustration_prompt(question: &Question) -> String {
    let mut prompt = format!(
        "Hình minh họa đơn giản, nền trắng, cho câu hỏi: {}",
        question.stem_text()
    );
    if let Some(hint) = question.illustration_hint() {
        prompt.push_str(". Mô tả hình: ");
        prompt.push_str(hint);
    }
    prompt
}

fn fetch_illustration(question: &Question, generator: &dyn IllustrationGenerator) -> Illustration {
    let request = IllustrationRequest {
        ordinal: question.ordinal(),
        prompt: illustration_prompt(question),
    };

    match generator.generate(&request).and_then(|bytes| decode_image(&bytes)) {
        Ok(illustration) => illustration,
        Err(err) => {
            warn!(ordinal = question.ordinal(), error = %err, "illustration unavailable, using placeholder");
            Illustration::Placeholder(format!(
                "[Hình minh họa cho câu {} không khả dụng: {err}]",
                question.ordinal()
            ))
        }
    }
}

/// Decode arbitrary image bytes and normalise them to PNG
fn decode_image(bytes: &[u8]) -> Result<Illustration, IllustrationError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| IllustrationError::InvalidImage(e.to_string()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| IllustrationError::InvalidImage(e.to_string()))?;

    Ok(Illustration::Image {
        png,
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::illustration::NoIllustrations;
    use crate::quiz::parse;

    #[test]
    fn test_consolidate_runs_merges_same_formatting() {
        let runs = vec![
            FormattedRun::bold("Câu 1."),
            FormattedRun::bold(" Test"),
            FormattedRun::plain(" tail"),
        ];
        let merged = FormattedRun::consolidate_runs(runs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Câu 1. Test");
    }

    #[test]
    fn test_stem_heading_uses_parse_ordinal() {
        let questions = parse("Câu 9. Một\nhai\nA. x");
        let layout = build_layout(&questions, &RenderOptions::default(), &NoIllustrations);
        assert_eq!(
            layout.blocks[0],
            Block::Paragraph {
                runs: vec![FormattedRun::bold("Câu 1. Một")]
            }
        );
        assert_eq!(
            layout.blocks[1],
            Block::Paragraph {
                runs: vec![FormattedRun::plain("hai")]
            }
        );
    }

    #[test]
    fn test_separators_only_between_questions() {
        let questions = parse("Câu 1. a\n---\nCâu 2. b\n---\nCâu 3. c");
        let layout = build_layout(&questions, &RenderOptions::default(), &NoIllustrations);
        let separators = layout
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Separator))
            .count();
        assert_eq!(separators, 2);
        assert!(!matches!(layout.blocks.last(), Some(Block::Separator)));
    }

    #[test]
    fn test_page_break_every_two_questions() {
        let raw = (1..=5)
            .map(|i| format!("Câu {i}. q{i}\nA. x"))
            .collect::<Vec<_>>()
            .join("\n---\n");
        let questions = parse(&raw);
        let options = RenderOptions {
            page_break_every_n: Some(2),
            ..RenderOptions::default()
        };
        let layout = build_layout(&questions, &options, &NoIllustrations);
        let breaks: Vec<&Block> = layout
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Separator | Block::PageBreak))
            .collect();
        assert_eq!(
            breaks,
            vec![
                &Block::Separator,
                &Block::PageBreak,
                &Block::Separator,
                &Block::PageBreak
            ]
        );
    }

    #[test]
    fn test_highlight_can_be_disabled() {
        let questions = parse("Câu 1. q\nA. x\nB. y\nĐáp án: B");
        let options = RenderOptions {
            highlight_correct_answer: false,
            ..RenderOptions::default()
        };
        let layout = build_layout(&questions, &options, &NoIllustrations);
        assert_eq!(layout.emphasized_count(), 0);
    }

    #[test]
    fn test_failed_illustration_becomes_placeholder() {
        let questions = parse("Câu 1. q\n[HÌNH MINH HỌA]\nA. x");
        let layout = build_layout(&questions, &RenderOptions::default(), &NoIllustrations);
        match &layout.blocks[1] {
            Block::Illustration {
                ordinal: 1,
                illustration: Illustration::Placeholder(text),
            } => assert!(text.contains("câu 1")),
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_illustrations_skipped_when_disabled() {
        let questions = parse("Câu 1. q\n[HÌNH MINH HỌA]\nA. x");
        let options = RenderOptions {
            include_illustrations: false,
            ..RenderOptions::default()
        };
        let layout = build_layout(&questions, &options, &NoIllustrations);
        assert!(
            !layout
                .blocks
                .iter()
                .any(|b| matches!(b, Block::Illustration { .. }))
        );
    }

    #[test]
    fn test_notes_rendered_on_request() {
        let questions = parse("Câu 1. q\nA. x\nĐáp án: A\nGiải thích: vì vậy");
        let options = RenderOptions {
            include_notes: true,
            ..RenderOptions::default()
        };
        let layout = build_layout(&questions, &options, &NoIllustrations);
        assert_eq!(
            layout.blocks.last(),
            Some(&Block::Paragraph {
                runs: vec![FormattedRun::italic("Giải thích: vì vậy")]
            })
        );
    }
}
