//! Word-processor adapter
//!
//! Builds a .docx with docx-rs: serif body font, fixed body size, 1.5 line
//! spacing, equal margins, bold question headings and the correct option in
//! bold emphasis colour.

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, LineSpacingType, PageMargin, Paragraph, Pic, Run,
    RunFonts,
};
use std::io::Cursor;

use super::layout::{Block, FormattedRun, Illustration, QuizLayout};
use crate::config::DocStyle;
use crate::error::{QuizError, Result};

/// English Metric Units per inch, used for picture extents
const EMU_PER_INCH: f32 = 914_400.0;
/// Word assumes 96 pixels per inch when sizing pictures
const EMU_PER_PIXEL: f32 = 9_525.0;

/// Build the .docx file and return its bytes
pub fn export_to_docx(layout: &QuizLayout, style: &DocStyle) -> Result<Vec<u8>> {
    let writer = DocxWriter::new(style);
    let margin = style.margin_twips();

    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        )
        .default_fonts(writer.fonts.clone())
        .default_size(style.half_points());

    for block in &layout.blocks {
        docx = docx.add_paragraph(writer.paragraph(block));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| QuizError::Export(e.to_string()))?;

    Ok(buffer.into_inner())
}

struct DocxWriter<'a> {
    style: &'a DocStyle,
    fonts: RunFonts,
    emphasis: String,
}

impl<'a> DocxWriter<'a> {
    fn new(style: &'a DocStyle) -> Self {
        let family = style.font_family.as_str();
        Self {
            style,
            fonts: RunFonts::new()
                .ascii(family)
                .hi_ansi(family)
                .east_asia(family)
                .cs(family),
            emphasis: style.emphasis_hex(),
        }
    }

    fn paragraph(&self, block: &Block) -> Paragraph {
        match block {
            Block::Title(title) => self
                .base_paragraph()
                .align(AlignmentType::Center)
                .add_run(self.run(title).bold().size(self.style.half_points() + 6)),
            Block::Paragraph { runs } => runs
                .iter()
                .fold(self.base_paragraph(), |para, run| para.add_run(self.formatted_run(run))),
            Block::Illustration { illustration, .. } => match illustration {
                Illustration::Image { png, width, height } => {
                    let (cx, cy) = self.picture_extent(*width, *height);
                    self.base_paragraph()
                        .align(AlignmentType::Center)
                        .add_run(Run::new().add_image(Pic::new(png).size(cx, cy)))
                }
                Illustration::Placeholder(text) => self
                    .base_paragraph()
                    .add_run(self.run(text).italic()),
            },
            Block::Choice {
                label,
                text,
                emphasized,
            } => {
                let run = self.run(&format!("{label}. {text}"));
                let run = if *emphasized {
                    run.bold().color(self.emphasis.as_str())
                } else {
                    run
                };
                self.base_paragraph().add_run(run)
            }
            Block::Separator => self.base_paragraph(),
            Block::PageBreak => Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
        }
    }

    fn base_paragraph(&self) -> Paragraph {
        Paragraph::new().line_spacing(
            LineSpacing::new()
                .line_rule(LineSpacingType::Auto)
                .line(self.style.line_twips() as _),
        )
    }

    fn run(&self, text: &str) -> Run {
        Run::new()
            .add_text(text)
            .fonts(self.fonts.clone())
            .size(self.style.half_points())
    }

    fn formatted_run(&self, run: &FormattedRun) -> Run {
        let mut docx_run = self.run(&run.text);
        if run.formatting.bold {
            docx_run = docx_run.bold();
        }
        if run.formatting.italic {
            docx_run = docx_run.italic();
        }
        docx_run
    }

    /// Picture size in EMU, scaled down to the configured maximum width
    fn picture_extent(&self, width_px: u32, height_px: u32) -> (u32, u32) {
        let natural_w = width_px as f32 * EMU_PER_PIXEL;
        let natural_h = height_px as f32 * EMU_PER_PIXEL;
        let max_w = self.style.max_image_width_inches * EMU_PER_INCH;
        let scale = if natural_w > max_w && natural_w > 0.0 {
            max_w / natural_w
        } else {
            1.0
        };
        (
            (natural_w * scale).round() as u32,
            (natural_h * scale).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_extent_scales_wide_images() {
        let style = DocStyle::default();
        let writer = DocxWriter::new(&style);
        // 96 px = 1 inch, stays as is
        assert_eq!(writer.picture_extent(96, 48), (914_400, 457_200));
        // 960 px = 10 inches, scaled to the 4 inch maximum
        assert_eq!(writer.picture_extent(960, 480), (3_657_600, 1_828_800));
    }
}
