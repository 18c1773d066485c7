use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use ttf_parser::Face;

use crate::theme::{FontStyle, LabelFont};

/// Width measurement context for label text.
///
/// Callers own the context and pass it into each layout pass, so any cache it
/// keeps lives exactly as long as the caller wants it to.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str, font: &LabelFont) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str, &LabelFont) -> f32,
{
    fn text_width(&mut self, text: &str, font: &LabelFont) -> f32 {
        self(text, font)
    }
}

/// Deterministic per-character widths, no font lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMeasurer;

impl TextMeasure for FallbackMeasurer {
    fn text_width(&mut self, text: &str, font: &LabelFont) -> f32 {
        fallback_text_width(text, font)
    }
}

pub fn fallback_text_width(text: &str, font: &LabelFont) -> f32 {
    if font.size <= 0.0 {
        return 0.0;
    }
    let base: f32 = text
        .chars()
        .filter(|ch| *ch != '\n')
        .map(char_width_factor)
        .sum::<f32>()
        * font.size;
    if font.is_bold() { base * 1.06 } else { base }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Relative advances of a typical sans-serif face at 1px.
    match ch {
        ' ' => 0.278,
        '.' | ',' | ':' | ';' | '|' | '!' | 'i' | 'l' | 'j' => 0.25,
        '(' | ')' | '[' | ']' | '{' | '}' | 'f' | 't' | 'r' => 0.333,
        '-' => 0.333,
        '0'..='9' => 0.556,
        'm' | 'w' => 0.833,
        'M' | 'W' => 0.9,
        'A'..='Z' => 0.667,
        'a'..='z' => 0.54,
        '\u{3b4}' | '\u{3bd}' => 0.56,
        '@' | '#' | '%' | '&' => 0.9,
        _ => 0.58,
    }
}

/// Measures with real glyph advances from system fonts.
///
/// The font database is loaded on first use and each font configuration is
/// resolved once; text that cannot be measured falls back to
/// [`fallback_text_width`].
pub struct FontMeasurer {
    db: OnceCell<Database>,
    faces: HashMap<String, Option<FontFace>>,
}

impl Default for FontMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMeasurer {
    pub fn new() -> Self {
        Self {
            db: OnceCell::new(),
            faces: HashMap::new(),
        }
    }

    /// Builds a measurer over an already populated database, skipping the
    /// system font scan.
    pub fn with_database(db: Database) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(db);
        Self {
            db: cell,
            faces: HashMap::new(),
        }
    }

    pub fn measure(&mut self, text: &str, font: &LabelFont) -> Option<f32> {
        if text.is_empty() || font.size <= 0.0 {
            return Some(0.0);
        }
        let key = font.cache_key();
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font);
            if face.is_none() {
                log::debug!("no system face for `{key}`, using fallback widths");
            }
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        face.measure_width(&text.replace('\t', "    "), font.size)
    }

    fn load_face(&self, font: &LabelFont) -> Option<FontFace> {
        let db = self.db.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} system font faces", db.len());
            db
        });

        let names: Vec<String> = font
            .family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight(font.weight),
            stretch: Stretch::Normal,
            style: match font.style {
                FontStyle::Normal => Style::Normal,
                FontStyle::Italic => Style::Italic,
                FontStyle::Oblique => Style::Oblique,
            },
        };
        let id = db.query(&query)?;
        let mut loaded = None;
        db.with_face_data(id, |data, index| {
            loaded = FontFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

impl TextMeasure for FontMeasurer {
    fn text_width(&mut self, text: &str, font: &LabelFont) -> f32 {
        self.measure(text, font)
            .unwrap_or_else(|| fallback_text_width(text, font))
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;

        if text.is_ascii() {
            for byte in text.bytes() {
                if byte == b'\n' {
                    continue;
                }
                match self.ascii_advances[byte as usize] {
                    0 => width += fallback,
                    advance => width += advance as f32 * scale,
                }
            }
            return Some(width.max(0.0));
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = *self.advance_cache.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            match advance {
                Some(value) if value > 0 => width += value as f32 * scale,
                _ => width += fallback,
            }
        }
        Some(width.max(0.0))
    }
}
