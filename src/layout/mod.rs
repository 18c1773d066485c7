mod best_link;
mod resolve;
mod stack_overlap;
mod text;
pub(crate) mod types;
pub use best_link::*;
pub use resolve::{resolve, resolve_points, resolve_unsorted};
pub use stack_overlap::*;
pub use text::measure_label;
pub use types::*;

use crate::config::{Config, ResolveConfig};
use crate::ir::{LabeledPoint, LayoutRequest, LinkLabel, PeakLabel, StripOptions};
use crate::scale::PlotProjection;
use crate::text_metrics::TextMeasure;

/// Runs one layout pass for `request`.
pub fn compute_layout<M: TextMeasure + ?Sized>(
    request: &LayoutRequest,
    config: &Config,
    measurer: &mut M,
) -> LayoutResult {
    match request {
        LayoutRequest::LabelStrip {
            points,
            scale,
            options,
        } => {
            let projected: Vec<LabeledPoint> =
                points.iter().map(|item| item.project(scale)).collect();
            let resolve_config = strip_config(&config.layout.resolve, options);
            // A reversed axis flips the order, so sort by pixel position.
            let groups = resolve_unsorted(&projected, &resolve_config, |point| point.coordinate);
            LayoutResult::LabelStrip { groups }
        }
        LayoutRequest::PeakStack {
            peaks,
            x_scale,
            y_scale,
        } => {
            let labels: Vec<PeakLabel> = peaks
                .iter()
                .map(|peak| PeakLabel::project(peak, x_scale, y_scale, config.theme.value_decimals))
                .collect();
            let flags = detect_overlaps(
                &labels,
                &config.layout.stack,
                &config.theme.label_font,
                measurer,
            );
            LayoutResult::PeakStack { flags }
        }
        LayoutRequest::Links {
            labels,
            moves,
            x_scale,
            y_scale,
        } => {
            let projection = PlotProjection::new(x_scale, y_scale);
            let mut positions = LabelPositions::from_labels(labels);
            for step in moves {
                positions.apply_delta(&step.id, step.dx, step.dy);
            }
            let size_of = |label: &LinkLabel| {
                label.size.or_else(|| {
                    label.text.as_deref().map(|text| {
                        measure_label(
                            text,
                            &config.theme.label_font,
                            config.theme.label_line_height,
                            &mut *measurer,
                        )
                        .size()
                    })
                })
            };
            let links = resolve_links(labels, &positions, &projection, &config.layout.link, size_of);
            LayoutResult::Links {
                links,
                positions: positions.into_inner(),
            }
        }
    }
}

fn strip_config(base: &ResolveConfig, options: &StripOptions) -> ResolveConfig {
    ResolveConfig {
        width: options.width.unwrap_or(base.width),
        margin: options.margin.unwrap_or(base.margin),
        group_margin: options.group_margin.unwrap_or(base.group_margin),
        threshold: options.threshold.or(base.threshold),
        max_iteration: options.max_iteration.unwrap_or(base.max_iteration),
    }
}
