use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LayoutError;

static FONT_SHORTHAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<prefix>(?:[A-Za-z0-9-]+\s+)*?)(?P<size>\d+(?:\.\d+)?)px\s+(?P<family>\S.*?)\s*$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

/// Font used to measure annotation labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFont {
    pub family: String,
    pub size: f32,
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: "Arial, Helvetica, sans-serif".to_string(),
            size: 11.0,
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

impl LabelFont {
    /// Parses a canvas-style font shorthand such as `italic bold 12px Arial`.
    pub fn parse_css(input: &str) -> Result<Self, LayoutError> {
        let invalid = || LayoutError::InvalidFont(input.to_string());
        let caps = FONT_SHORTHAND_RE.captures(input).ok_or_else(invalid)?;
        let size: f32 = caps["size"].parse().map_err(|_| invalid())?;
        let mut font = LabelFont {
            family: caps["family"].to_string(),
            size,
            ..LabelFont::default()
        };
        for token in caps["prefix"].split_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "normal" => {}
                "italic" => font.style = FontStyle::Italic,
                "oblique" => font.style = FontStyle::Oblique,
                "bold" => font.weight = 700,
                "lighter" => font.weight = 300,
                "bolder" => font.weight = 800,
                other => {
                    font.weight = other
                        .parse::<u16>()
                        .ok()
                        .filter(|w| (100..=900).contains(w) && w % 100 == 0)
                        .ok_or_else(invalid)?;
                }
            }
        }
        Ok(font)
    }

    pub fn to_css(&self) -> String {
        format!(
            "{} {} {}px {}",
            self.style.as_css(),
            self.weight,
            self.size,
            self.family
        )
    }

    /// Key identifying one measurement configuration.
    pub fn cache_key(&self) -> String {
        self.to_css()
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl fmt::Display for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub label_font: LabelFont,
    pub label_line_height: f32,
    pub value_decimals: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    pub fn standard() -> Self {
        Self {
            label_font: LabelFont::default(),
            label_line_height: 1.2,
            value_decimals: 2,
        }
    }

    pub fn compact() -> Self {
        Self {
            label_font: LabelFont {
                family: "Inter, Segoe UI, system-ui, sans-serif".to_string(),
                size: 9.0,
                ..LabelFont::default()
            },
            label_line_height: 1.1,
            value_decimals: 3,
        }
    }
}
