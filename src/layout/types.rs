use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::Point;

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

/// Pixel footprint of one label group along the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMeta {
    /// Position of the group in the strip, left to right.
    pub id: usize,
    pub width: f32,
    pub mid: f32,
    pub start: f32,
    pub end: f32,
}

impl GroupMeta {
    pub(crate) fn shifted(self, shift: f32) -> Self {
        Self {
            mid: self.mid + shift,
            start: self.start + shift,
            end: self.end + shift,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGroup<T> {
    pub members: Vec<T>,
    pub meta: GroupMeta,
}

/// Per-label visibility decision: `true` means the label text should be
/// hidden because a taller neighbour claims the spot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapFlags(BTreeMap<String, bool>);

impl OverlapFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, id: &str, hidden: bool) {
        self.0.insert(id.to_string(), hidden);
    }

    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.0.iter().map(|(id, hidden)| (id.as_str(), *hidden))
    }

    pub fn hidden_count(&self) -> usize {
        self.0.values().filter(|hidden| **hidden).count()
    }
}

/// Short tick drawn out of one edge of a label box; `a` touches the box side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSegment {
    pub a: Point,
    pub b: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateLink {
    pub source: TickSegment,
    pub target: Point,
    pub distance: f32,
    /// Degrees; 180 means the leader line continues the tick straight on.
    pub angle: f64,
}

/// Connector polyline `a -> b -> target` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    pub a: Point,
    pub b: Point,
    pub target: Point,
}

impl LinkPath {
    pub fn points(&self) -> [Point; 3] {
        [self.a, self.b, self.target]
    }
}

impl From<&CandidateLink> for LinkPath {
    fn from(candidate: &CandidateLink) -> Self {
        Self {
            a: candidate.source.a,
            b: candidate.source.b,
            target: candidate.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutResult {
    LabelStrip {
        groups: Vec<ResolvedGroup<crate::ir::LabeledPoint>>,
    },
    PeakStack {
        flags: OverlapFlags,
    },
    /// `None` marks a label that has no measured size yet.
    Links {
        links: BTreeMap<String, Option<LinkPath>>,
        positions: BTreeMap<String, Point>,
    },
}
