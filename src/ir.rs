use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};
use crate::scale::{LinearScale, Projection};

/// One annotatable value projected onto the ordering axis of a label strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledPoint {
    pub id: String,
    /// Pixel position along the strip.
    pub coordinate: f32,
    /// Source value, e.g. the chemical shift of a range.
    pub value: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_keys: Vec<String>,
}

impl LabeledPoint {
    pub fn new(id: impl Into<String>, coordinate: f32, value: f32) -> Self {
        Self {
            id: id.into(),
            coordinate,
            value,
            parent_keys: Vec::new(),
        }
    }

    pub fn with_parent_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.parent_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// A strip item expressed in data units, before projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripItem {
    pub id: String,
    pub value: f32,
    #[serde(default)]
    pub parent_keys: Vec<String>,
}

impl StripItem {
    pub fn project(&self, scale: &impl Projection) -> LabeledPoint {
        LabeledPoint {
            id: self.id.clone(),
            coordinate: scale.project(self.value),
            value: self.value,
            parent_keys: self.parent_keys.clone(),
        }
    }
}

/// A picked peak in data units: `x` is the shift, `y` the intensity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peak {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub text: Option<String>,
}

/// A peak value label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakLabel {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Intensity used to pick the label that stays visible.
    pub height: f32,
    pub text: String,
}

impl PeakLabel {
    pub fn new(
        id: impl Into<String>,
        x: f32,
        y: f32,
        height: f32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            height,
            text: text.into(),
        }
    }

    /// Projects a peak into pixels; without explicit text the shift is
    /// printed with `decimals` fraction digits.
    pub fn project(
        peak: &Peak,
        x_scale: &impl Projection,
        y_scale: &impl Projection,
        decimals: usize,
    ) -> Self {
        let text = peak
            .text
            .clone()
            .unwrap_or_else(|| format_value(peak.x, decimals));
        Self {
            id: peak.id.clone(),
            x: x_scale.project(peak.x),
            y: y_scale.project(peak.y),
            height: peak.y,
            text,
        }
    }
}

pub fn format_value(value: f32, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Rectangular data region a floating label points at, in data units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorBoundary {
    pub x1: f32,
    pub x2: f32,
    pub y1: f32,
    pub y2: f32,
}

impl AnchorBoundary {
    pub fn new(x1: f32, x2: f32, y1: f32, y2: f32) -> Self {
        Self { x1, x2, y1, y2 }
    }
}

/// A movable label attached to a region, e.g. a 2D zone assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkLabel {
    pub id: String,
    /// Centre of the label box in pixels.
    pub position: Point,
    pub boundary: AnchorBoundary,
    /// Rendered box size, absent until the label has been drawn once.
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A position delta emitted by the drag controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelMove {
    pub id: String,
    pub dx: f32,
    pub dy: f32,
}

/// Overrides for the label strip resolver; unset fields use the configured
/// values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripOptions {
    pub width: Option<f32>,
    pub margin: Option<f32>,
    pub group_margin: Option<f32>,
    pub threshold: Option<f32>,
    pub max_iteration: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutRequest {
    #[serde(rename_all = "camelCase")]
    LabelStrip {
        points: Vec<StripItem>,
        scale: LinearScale,
        #[serde(default)]
        options: StripOptions,
    },
    #[serde(rename_all = "camelCase")]
    PeakStack {
        peaks: Vec<Peak>,
        x_scale: LinearScale,
        y_scale: LinearScale,
    },
    #[serde(rename_all = "camelCase")]
    Links {
        labels: Vec<LinkLabel>,
        #[serde(default)]
        moves: Vec<LabelMove>,
        x_scale: LinearScale,
        y_scale: LinearScale,
    },
}

impl LayoutRequest {
    pub fn from_json(input: &str) -> Result<Self, crate::error::LayoutError> {
        let request: Self = serde_json::from_str(input)?;
        request.validate()?;
        Ok(request)
    }

    /// Parses either one request object or an array of requests.
    pub fn batch_from_json(input: &str) -> Result<Vec<Self>, crate::error::LayoutError> {
        let requests = if input.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Self>>(input)?
        } else {
            vec![serde_json::from_str::<Self>(input)?]
        };
        for request in &requests {
            request.validate()?;
        }
        Ok(requests)
    }

    pub fn validate(&self) -> Result<(), crate::error::LayoutError> {
        match self {
            LayoutRequest::LabelStrip { scale, .. } => scale.validate(),
            LayoutRequest::PeakStack {
                x_scale, y_scale, ..
            }
            | LayoutRequest::Links {
                x_scale, y_scale, ..
            } => {
                x_scale.validate()?;
                y_scale.validate()
            }
        }
    }
}
