// Peak value labels on stacked spectra: cluster labels whose footprints touch
// horizontally, then keep only the tallest label of each vertical pile.

use super::OverlapFlags;
use crate::config::StackConfig;
use crate::ir::PeakLabel;
use crate::text_metrics::TextMeasure;
use crate::theme::LabelFont;

/// A label taking part in overlap detection. Coordinates are pixels.
pub trait StackedLabel {
    fn id(&self) -> &str;
    fn label_text(&self) -> &str;
    fn x(&self) -> f32;
    fn y(&self) -> f32;
    /// Ranking value; the highest label in a pile stays visible.
    fn height(&self) -> f32;
}

impl StackedLabel for PeakLabel {
    fn id(&self) -> &str {
        &self.id
    }

    fn label_text(&self) -> &str {
        &self.text
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// Decides which labels to hide, measuring label text with `measurer`.
pub fn detect_overlaps<T, M>(
    points: &[T],
    config: &StackConfig,
    font: &LabelFont,
    measurer: &mut M,
) -> OverlapFlags
where
    T: StackedLabel,
    M: TextMeasure + ?Sized,
{
    detect_overlaps_with(points, config, |text| measurer.text_width(text, font))
}

/// Decides which labels to hide.
///
/// Points are walked in the given order, which should follow the pixel x
/// axis. Every input id gets exactly one entry; within each vertical pile
/// exactly one label is visible.
pub fn detect_overlaps_with<T, W>(
    points: &[T],
    config: &StackConfig,
    mut measure_width: W,
) -> OverlapFlags
where
    T: StackedLabel,
    W: FnMut(&str) -> f32,
{
    let mut flags = OverlapFlags::new();
    let mut cluster: Vec<&T> = Vec::new();
    let mut last_position: Option<f32> = None;

    for point in points {
        let label_width = measure_width(point.label_text()) + config.x_offset;
        let label_position = point.x() + label_width;
        match last_position {
            Some(last) if (label_position - last).abs() < label_width => cluster.push(point),
            _ => {
                resolve_vertical(&cluster, config.label_height, &mut flags);
                cluster.clear();
                cluster.push(point);
                last_position = Some(label_position);
            }
        }
    }
    resolve_vertical(&cluster, config.label_height, &mut flags);

    log::debug!(
        "peak labels: {} of {} hidden",
        flags.hidden_count(),
        points.len()
    );
    flags
}

fn resolve_vertical<T: StackedLabel>(cluster: &[&T], label_height: f32, flags: &mut OverlapFlags) {
    if cluster.is_empty() {
        return;
    }
    let mut sorted = cluster.to_vec();
    sorted.sort_by(|a, b| b.height().total_cmp(&a.height()));

    let mut start = 0;
    let mut last_y = sorted[0].y();
    for idx in 1..sorted.len() {
        let y = sorted[idx].y();
        if (y - last_y).abs() < label_height {
            continue;
        }
        mark_winner(&sorted[start..idx], flags);
        start = idx;
        last_y = y;
    }
    mark_winner(&sorted[start..], flags);
}

fn mark_winner<T: StackedLabel>(pile: &[&T], flags: &mut OverlapFlags) {
    let mut winner = 0;
    for (idx, label) in pile.iter().enumerate().skip(1) {
        if label.height() > pile[winner].height() {
            winner = idx;
        }
    }
    for (idx, label) in pile.iter().enumerate() {
        flags.set(label.id(), idx != winner);
    }
}
