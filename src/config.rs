use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QuizError, Result};

/// Configuration for quizdoc, stored as TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub style: DocStyle,
}

/// What the renderer emits for each question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Emphasise the option named by the answer marker
    pub highlight_correct_answer: bool,
    /// Ask the illustration generator for marked questions
    pub include_illustrations: bool,
    /// Page break after every N questions in paginated output
    pub page_break_every_n: Option<usize>,
    /// Emit explanation lines that followed the options
    pub include_notes: bool,
    /// Centred title above the first question
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight_correct_answer: true,
            include_illustrations: true,
            page_break_every_n: None,
            include_notes: false,
            title: None,
        }
    }
}

impl RenderOptions {
    /// Page-break interval, treating 0 as disabled
    pub fn page_break_interval(&self) -> Option<usize> {
        self.page_break_every_n.filter(|n| *n > 0)
    }
}

/// Typography of the exported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocStyle {
    /// Serif body font family
    pub font_family: String,
    /// Body size in points
    pub font_size_pt: f32,
    /// Line spacing multiple (1.5 = one and a half lines)
    pub line_spacing: f32,
    /// Margin on every side, in inches
    pub margin_inches: f32,
    /// Colour of the emphasised option, hex RGB
    pub emphasis_color: String,
    /// Widest illustration allowed, in inches
    pub max_image_width_inches: f32,
}

impl Default for DocStyle {
    fn default() -> Self {
        DocStyle {
            font_family: "Times New Roman".to_string(),
            font_size_pt: 13.0,
            line_spacing: 1.5,
            margin_inches: 0.8,
            emphasis_color: "#FF0000".to_string(), // Pure red
            max_image_width_inches: 4.0,
        }
    }
}

impl DocStyle {
    /// Font size in half-points, the unit Word uses for `w:sz`
    pub fn half_points(&self) -> usize {
        (self.font_size_pt * 2.0).round().max(1.0) as usize
    }

    /// Line spacing in 240ths of a line (`w:line` with the auto rule)
    pub fn line_twips(&self) -> i32 {
        (self.line_spacing * 240.0).round() as i32
    }

    /// Margin in twentieths of a point
    pub fn margin_twips(&self) -> i32 {
        (self.margin_inches * 1440.0).round() as i32
    }

    /// Emphasis colour as six uppercase hex digits without `#`
    pub fn emphasis_hex(&self) -> String {
        let hex = self.emphasis_color.trim_start_matches('#');
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            hex.to_ascii_uppercase()
        } else {
            "FF0000".to_string()
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| QuizError::Config(format!("{}: {e}", path.display())))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quizdoc").join("config.toml"))
    }

    /// Write the default configuration, returning where it went
    pub fn init_default() -> Result<PathBuf> {
        let path = Self::get_config_path()
            .ok_or_else(|| QuizError::Config("no config directory on this platform".to_string()))?;
        Config::default().save_to(&path)?;
        Ok(path)
    }
}
