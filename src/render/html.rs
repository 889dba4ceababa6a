//! HTML preview adapter

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt::Write;

use super::layout::{Block, FormattedRun, Illustration, QuizLayout};
use crate::config::DocStyle;
use crate::error::Result;

/// Render the layout as a self-contained HTML fragment
pub fn export_to_html(layout: &QuizLayout, style: &DocStyle) -> Result<String> {
    let mut output = String::new();
    let emphasis = format!("#{}", style.emphasis_hex());

    writeln!(
        output,
        "<div class=\"quiz\" style=\"font-family: '{}', serif; font-size: {}pt; line-height: {};\">",
        escape_html(&style.font_family),
        style.font_size_pt,
        style.line_spacing
    )?;

    for block in &layout.blocks {
        match block {
            Block::Title(title) => {
                writeln!(
                    output,
                    "<h1 style=\"text-align: center;\">{}</h1>",
                    escape_html(title)
                )?;
            }
            Block::Paragraph { runs } => {
                writeln!(output, "<p>{}</p>", format_runs(runs))?;
            }
            Block::Illustration {
                ordinal,
                illustration,
            } => match illustration {
                Illustration::Image { png, width, .. } => {
                    writeln!(
                        output,
                        "<figure class=\"illustration\"><img src=\"data:image/png;base64,{}\" alt=\"Hình minh họa câu {ordinal}\" style=\"max-width: {}px;\"></figure>",
                        BASE64.encode(png),
                        width
                    )?;
                }
                Illustration::Placeholder(text) => {
                    writeln!(
                        output,
                        "<p class=\"illustration-placeholder\"><em>{}</em></p>",
                        escape_html(text)
                    )?;
                }
            },
            Block::Choice {
                label,
                text,
                emphasized,
            } => {
                let line = escape_html(&format!("{label}. {text}"));
                if *emphasized {
                    writeln!(
                        output,
                        "<p class=\"option correct\"><strong style=\"color: {emphasis};\">{line}</strong></p>"
                    )?;
                } else {
                    writeln!(output, "<p class=\"option\">{line}</p>")?;
                }
            }
            // The preview is not paginated, so a page break is just a separator
            Block::Separator | Block::PageBreak => output.push_str("<hr>\n"),
        }
    }

    output.push_str("</div>\n");
    Ok(output)
}

fn format_runs(runs: &[FormattedRun]) -> String {
    let mut html = String::new();
    for run in runs {
        let mut text = escape_html(&run.text);
        if run.formatting.italic {
            text = format!("<em>{text}</em>");
        }
        if run.formatting.bold {
            text = format!("<strong>{text}</strong>");
        }
        html.push_str(&text);
    }
    html
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
