use crate::geometry::Size;
use crate::text_metrics::TextMeasure;
use crate::theme::LabelFont;

use super::TextBlock;

/// Measures a possibly multi-line label. Stands in for the rendered bounding
/// box of a label that has not been drawn yet.
pub fn measure_label<M: TextMeasure + ?Sized>(
    text: &str,
    font: &LabelFont,
    line_height: f32,
    measurer: &mut M,
) -> TextBlock {
    let mut lines = split_lines(text);
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| measurer.text_width(line, font))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font.size * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

impl TextBlock {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}
