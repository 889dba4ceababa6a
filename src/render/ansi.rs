//! Terminal preview adapter

use crossterm::style::{
    Attribute, Color as CrosstermColor, ResetColor, SetAttribute, SetForegroundColor,
};
use std::fmt::Write;

use super::layout::{Block, Illustration, QuizLayout};
use crate::ColorDepth;
use crate::config::DocStyle;
use crate::error::Result;

const TITLE_COLOR: &str = "FFFF00";
const MUTED_COLOR: &str = "666666";
const IMAGE_COLOR: &str = "FF00FF";

pub struct AnsiOptions {
    pub terminal_width: usize,
    pub color_depth: ColorDepth,
}

impl Default for AnsiOptions {
    fn default() -> Self {
        Self {
            terminal_width: std::env::var("COLUMNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(80),
            color_depth: ColorDepth::Auto,
        }
    }
}

/// Render the layout for a terminal, emphasising the correct option
pub fn export_to_ansi(layout: &QuizLayout, style: &DocStyle, options: &AnsiOptions) -> Result<String> {
    let mut output = String::new();
    let depth = &options.color_depth;
    let emphasis = style.emphasis_hex();

    for block in &layout.blocks {
        match block {
            Block::Title(title) => {
                writeln!(output, "{}", Paint::bold().color(TITLE_COLOR, depth).apply(title))?;
                writeln!(output, "{}\n", "=".repeat(options.terminal_width.min(50)))?;
            }
            Block::Paragraph { runs } => {
                for run in runs {
                    let paint = Paint {
                        bold: run.formatting.bold,
                        italic: run.formatting.italic,
                        color: None,
                    };
                    output.push_str(&paint.apply(&run.text));
                }
                output.push('\n');
            }
            Block::Illustration { illustration, .. } => {
                let line = match illustration {
                    Illustration::Image { width, height, .. } => Paint::default()
                        .color(IMAGE_COLOR, depth)
                        .apply(&format!("🖼️  [Hình minh họa {width}x{height}]")),
                    Illustration::Placeholder(text) => {
                        Paint::italic().color(MUTED_COLOR, depth).apply(text)
                    }
                };
                writeln!(output, "{line}")?;
            }
            Block::Choice {
                label,
                text,
                emphasized,
            } => {
                let paint = if *emphasized {
                    Paint::bold().color(&emphasis, depth)
                } else {
                    Paint::default()
                };
                writeln!(output, "{}", paint.apply(&format!("  {label}. {text}")))?;
            }
            Block::Separator => output.push('\n'),
            Block::PageBreak => {
                let rule = "─".repeat(options.terminal_width.min(60));
                writeln!(
                    output,
                    "\n{}\n",
                    Paint::default().color(MUTED_COLOR, depth).apply(&rule)
                )?;
            }
        }
    }

    Ok(output)
}

/// Text attributes for one span of terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Paint {
    bold: bool,
    italic: bool,
    color: Option<CrosstermColor>,
}

impl Paint {
    fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    /// Set the foreground from a hex colour; dropped in monochrome or on bad hex
    fn color(self, hex: &str, depth: &ColorDepth) -> Self {
        Self {
            color: hex_rgb(hex).and_then(|rgb| terminal_color(rgb, depth)),
            ..self
        }
    }

    /// Wrap `text` in escape codes; plain text comes back untouched
    fn apply(&self, text: &str) -> String {
        if !self.bold && !self.italic && self.color.is_none() {
            return text.to_string();
        }

        let mut styled = String::new();
        if self.bold {
            styled.push_str(&SetAttribute(Attribute::Bold).to_string());
        }
        if self.italic {
            styled.push_str(&SetAttribute(Attribute::Italic).to_string());
        }
        if let Some(color) = self.color {
            styled.push_str(&SetForegroundColor(color).to_string());
        }
        styled.push_str(text);
        styled.push_str(&SetAttribute(Attribute::Reset).to_string());
        styled.push_str(&ResetColor.to_string());
        styled
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

fn terminal_color(rgb: (u8, u8, u8), depth: &ColorDepth) -> Option<CrosstermColor> {
    let (r, g, b) = rgb;
    match depth {
        ColorDepth::Monochrome => None,
        ColorDepth::Standard => Some(CrosstermColor::AnsiValue(ansi_16(rgb))),
        ColorDepth::Extended => Some(CrosstermColor::AnsiValue(ansi_256(rgb))),
        ColorDepth::TrueColor | ColorDepth::Auto => Some(CrosstermColor::Rgb { r, g, b }),
    }
}

/// Nearest of the 16 basic colours: one bit per lit channel, bright when any
/// channel is above half
fn ansi_16((r, g, b): (u8, u8, u8)) -> u8 {
    let base = u8::from(r > 64) | u8::from(g > 64) << 1 | u8::from(b > 64) << 2;
    if r.max(g).max(b) > 127 { base + 8 } else { base }
}

/// Index into the 256-colour palette (grey ramp or 6x6x6 cube)
fn ansi_256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            248..=255 => 231,
            _ => 232 + (r - 8) / 10,
        };
    }
    let level = |c: u8| (u16::from(c) * 5 / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_red_mappings() {
        assert_eq!(ansi_16((255, 0, 0)), 9);
        assert_eq!(ansi_256((255, 0, 0)), 196);
        assert_eq!(
            terminal_color((255, 0, 0), &ColorDepth::TrueColor),
            Some(CrosstermColor::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(terminal_color((255, 0, 0), &ColorDepth::Monochrome), None);
    }

    #[test]
    fn test_dim_and_grey_colours() {
        assert_eq!(ansi_16((0x66, 0x66, 0x66)), 7);
        assert_eq!(ansi_16((0, 0, 0)), 0);
        assert_eq!(ansi_256((0x66, 0x66, 0x66)), 241);
        assert_eq!(ansi_256((255, 255, 255)), 231);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex_rgb("#FF8000"), Some((255, 128, 0)));
        assert_eq!(hex_rgb("0055aa"), Some((0, 0x55, 0xAA)));
        assert_eq!(hex_rgb("red"), None);
    }

    #[test]
    fn test_plain_text_has_no_escape_codes() {
        assert_eq!(Paint::default().apply("A. x"), "A. x");
        assert_eq!(
            Paint::default().color("#FF0000", &ColorDepth::Monochrome).apply("A. x"),
            "A. x"
        );
    }
}
