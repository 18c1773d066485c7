#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod scale;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, LinkConfig, ResolveConfig, StackConfig, load_config};
pub use error::LayoutError;
pub use geometry::{Point, Size};
pub use ir::{AnchorBoundary, LabeledPoint, LayoutRequest, PeakLabel};
pub use layout::{
    LayoutResult, LinkPath, OverlapFlags, ResolvedGroup, compute_layout, detect_overlaps,
    detect_overlaps_with, find_best_link, resolve, resolve_points,
};
pub use scale::{LinearScale, PlotProjection, Projection};
pub use text_metrics::{FallbackMeasurer, FontMeasurer, TextMeasure};
pub use theme::{LabelFont, Theme};
