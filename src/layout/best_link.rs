// Connector geometry between a dragged label and the region it annotates.

use std::collections::BTreeMap;

use super::{CandidateLink, LinkPath, TickSegment};
use crate::config::LinkConfig;
use crate::geometry::{Point, Size, triangle_angle_at_vertex};
use crate::ir::{AnchorBoundary, LinkLabel};
use crate::scale::{PlotProjection, Projection};

/// Angles (degrees) closer than this are considered equally straight.
const ANGLE_EPS: f64 = 1e-6;

/// Tick segments on the bottom, top, left and right edges of a label box
/// centred on `center`. Screen space, y grows downwards.
pub fn source_ticks(center: Point, size: Size, config: &LinkConfig) -> [TickSegment; 4] {
    let half_w = size.width / 2.0;
    let half_h = size.height / 2.0;
    let near_y = half_h + config.shift;
    let far_y = near_y + config.side_length;
    let near_x = half_w + config.shift;
    let far_x = near_x + config.side_length;
    [
        TickSegment {
            a: center.translate(0.0, near_y),
            b: center.translate(0.0, far_y),
        },
        TickSegment {
            a: center.translate(0.0, -near_y),
            b: center.translate(0.0, -far_y),
        },
        TickSegment {
            a: center.translate(-near_x, 0.0),
            b: center.translate(-far_x, 0.0),
        },
        TickSegment {
            a: center.translate(near_x, 0.0),
            b: center.translate(far_x, 0.0),
        },
    ]
}

/// Midpoints of the four edges of `boundary` after projection: the `y1`
/// edge, the `y2` edge, the `x1` edge and the `x2` edge.
pub fn target_points<X: Projection, Y: Projection>(
    boundary: &AnchorBoundary,
    projection: &PlotProjection<X, Y>,
) -> [Point; 4] {
    let x1 = projection.x.project(boundary.x1);
    let x2 = projection.x.project(boundary.x2);
    let y1 = projection.y.project(boundary.y1);
    let y2 = projection.y.project(boundary.y2);
    let mid_x = (x1 + x2) / 2.0;
    let mid_y = (y1 + y2) / 2.0;
    [
        Point::new(mid_x, y1),
        Point::new(mid_x, y2),
        Point::new(x1, mid_y),
        Point::new(x2, mid_y),
    ]
}

/// Scores one tick/target pairing.
///
/// The angle is taken at the tick's outer end `b`, between the tick and the
/// leader line, so 180 degrees means the leader carries straight on.
pub fn score_candidate(source: TickSegment, target: Point) -> CandidateLink {
    let a_len = length(source.a, target);
    let b_len = length(source.b, target);
    let delta = length(source.a, source.b);
    CandidateLink {
        source,
        target,
        distance: a_len.min(b_len) as f32,
        angle: triangle_angle_at_vertex(a_len, b_len, delta),
    }
}

fn length(p: Point, q: Point) -> f64 {
    let dx = f64::from(p.x) - f64::from(q.x);
    let dy = f64::from(p.y) - f64::from(q.y);
    (dx * dx + dy * dy).sqrt()
}

/// Straighter wins; among equally straight candidates the shorter wins.
fn candidate_better(candidate: &CandidateLink, best: &CandidateLink) -> bool {
    if (candidate.angle - best.angle).abs() > ANGLE_EPS {
        return candidate.angle > best.angle;
    }
    candidate.distance < best.distance
}

pub fn candidates<X: Projection, Y: Projection>(
    center: Point,
    boundary: &AnchorBoundary,
    size: Size,
    projection: &PlotProjection<X, Y>,
    config: &LinkConfig,
) -> Vec<CandidateLink> {
    let targets = target_points(boundary, projection);
    source_ticks(center, size, config)
        .into_iter()
        .flat_map(|tick| targets.iter().map(move |target| score_candidate(tick, *target)))
        .collect()
}

/// Picks the connector from a label centred on `position` to `boundary`.
///
/// Returns `None` while the label has no measured size; callers retry on the
/// next layout pass.
pub fn find_best_link<X: Projection, Y: Projection>(
    position: Point,
    boundary: &AnchorBoundary,
    size: Option<Size>,
    projection: &PlotProjection<X, Y>,
    config: &LinkConfig,
) -> Option<LinkPath> {
    let size = size?;
    let all = candidates(position, boundary, size, projection, config);
    let best = best_candidate(&all)?;
    log::trace!(
        "best link angle {:.2} distance {:.2} -> ({:.1}, {:.1})",
        best.angle,
        best.distance,
        best.target.x,
        best.target.y
    );
    Some(LinkPath::from(best))
}

/// Straightest candidate, nearest among equally straight ones; on a full tie
/// the earlier candidate stays. Non-finite scores are skipped.
pub fn best_candidate(candidates: &[CandidateLink]) -> Option<&CandidateLink> {
    let mut best: Option<&CandidateLink> = None;
    for candidate in candidates {
        if !candidate.angle.is_finite() || !candidate.distance.is_finite() {
            continue;
        }
        match best {
            Some(current) if !candidate_better(candidate, current) => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Label centres keyed by annotation id, updated from drag deltas.
#[derive(Debug, Clone, Default)]
pub struct LabelPositions {
    positions: BTreeMap<String, Point>,
}

impl LabelPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_labels(labels: &[LinkLabel]) -> Self {
        Self {
            positions: labels
                .iter()
                .map(|label| (label.id.clone(), label.position))
                .collect(),
        }
    }

    pub fn set(&mut self, id: impl Into<String>, position: Point) {
        self.positions.insert(id.into(), position);
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Moves a known label; returns the new position, or `None` for an id
    /// that has no position yet.
    pub fn apply_delta(&mut self, id: &str, dx: f32, dy: f32) -> Option<Point> {
        let Some(position) = self.positions.get_mut(id) else {
            log::debug!("ignoring drag for unknown label `{id}`");
            return None;
        };
        *position = position.translate(dx, dy);
        Some(*position)
    }

    pub fn into_inner(self) -> BTreeMap<String, Point> {
        self.positions
    }
}

/// Recomputes the connector of every label from its current position.
pub fn resolve_links<X: Projection, Y: Projection>(
    labels: &[LinkLabel],
    positions: &LabelPositions,
    projection: &PlotProjection<X, Y>,
    config: &LinkConfig,
    mut size_of: impl FnMut(&LinkLabel) -> Option<Size>,
) -> BTreeMap<String, Option<LinkPath>> {
    labels
        .iter()
        .map(|label| {
            let position = positions.get(&label.id).unwrap_or(label.position);
            let size = size_of(label);
            let link = find_best_link(position, &label.boundary, size, projection, config);
            (label.id.clone(), link)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;

    fn identity() -> PlotProjection<LinearScale, LinearScale> {
        PlotProjection::new(
            LinearScale::new([0.0, 1000.0], [0.0, 1000.0]).expect("x"),
            LinearScale::new([0.0, 1000.0], [0.0, 1000.0]).expect("y"),
        )
    }

    fn label_box() -> Size {
        Size::new(40.0, 20.0)
    }

    #[test]
    fn unmeasured_label_is_not_resolvable() {
        let boundary = AnchorBoundary::new(0.0, 10.0, 0.0, 10.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            None,
            &identity(),
            &LinkConfig::default(),
        );
        assert!(link.is_none());
    }

    #[test]
    fn ticks_sit_outside_the_box() {
        let ticks = source_ticks(Point::new(100.0, 100.0), label_box(), &LinkConfig::default());
        // bottom
        assert_eq!(ticks[0].a, Point::new(100.0, 115.0));
        assert_eq!(ticks[0].b, Point::new(100.0, 121.0));
        // top
        assert_eq!(ticks[1].a, Point::new(100.0, 85.0));
        assert_eq!(ticks[1].b, Point::new(100.0, 79.0));
        // left
        assert_eq!(ticks[2].a, Point::new(75.0, 100.0));
        assert_eq!(ticks[2].b, Point::new(69.0, 100.0));
        // right
        assert_eq!(ticks[3].a, Point::new(125.0, 100.0));
        assert_eq!(ticks[3].b, Point::new(131.0, 100.0));
    }

    #[test]
    fn targets_are_edge_midpoints() {
        let boundary = AnchorBoundary::new(10.0, 30.0, 100.0, 140.0);
        let targets = target_points(&boundary, &identity());
        assert_eq!(targets[0], Point::new(20.0, 100.0));
        assert_eq!(targets[1], Point::new(20.0, 140.0));
        assert_eq!(targets[2], Point::new(10.0, 120.0));
        assert_eq!(targets[3], Point::new(30.0, 120.0));
    }

    #[test]
    fn region_below_uses_bottom_tick() {
        let boundary = AnchorBoundary::new(90.0, 110.0, 300.0, 340.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            Some(label_box()),
            &identity(),
            &LinkConfig::default(),
        )
        .expect("measured label");
        assert_eq!(link.a, Point::new(100.0, 115.0));
        assert_eq!(link.b, Point::new(100.0, 121.0));
        // straight down to the nearest edge midpoint
        assert_eq!(link.target, Point::new(100.0, 300.0));
    }

    #[test]
    fn region_above_uses_top_tick() {
        let boundary = AnchorBoundary::new(90.0, 110.0, 0.0, 20.0);
        let link = find_best_link(
            Point::new(100.0, 200.0),
            &boundary,
            Some(label_box()),
            &identity(),
            &LinkConfig::default(),
        )
        .expect("measured label");
        assert_eq!(link.a, Point::new(100.0, 185.0));
        assert_eq!(link.target, Point::new(100.0, 20.0));
    }

    #[test]
    fn region_to_the_right_uses_right_tick() {
        let boundary = AnchorBoundary::new(400.0, 420.0, 90.0, 110.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            Some(label_box()),
            &identity(),
            &LinkConfig::default(),
        )
        .expect("measured label");
        assert_eq!(link.b, Point::new(131.0, 100.0));
        assert_eq!(link.target, Point::new(400.0, 100.0));
    }

    #[test]
    fn equal_angles_prefer_shorter_distance() {
        // Both y-edge midpoints are collinear with the bottom tick, so both
        // score 180 degrees; the nearer one must win.
        let boundary = AnchorBoundary::new(100.0, 100.0, 500.0, 200.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            Some(label_box()),
            &identity(),
            &LinkConfig::default(),
        )
        .expect("measured label");
        assert_eq!(link.target, Point::new(100.0, 200.0));
    }

    #[test]
    fn slightly_straighter_far_edge_beats_near_edge() {
        // A 0.2 px offset makes the near edge about 0.4 degrees less straight
        // than the far edge; straightness still decides.
        let boundary = AnchorBoundary::new(100.2, 100.2, 150.0, 300.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            Some(label_box()),
            &identity(),
            &LinkConfig::default(),
        )
        .expect("measured label");
        assert_eq!(link.a, Point::new(100.0, 115.0));
        assert!((link.target.x - 100.2).abs() < 1e-3);
        assert_eq!(link.target.y, 300.0);
    }

    #[test]
    fn small_angles_are_resolved() {
        let tick = TickSegment {
            a: Point::new(100.0, 85.0),
            b: Point::new(100.0, 79.0),
        };
        let candidate = score_candidate(tick, Point::new(100.2, 225.0));
        let expected = (0.2f64 / 146.0).atan().to_degrees();
        assert!(candidate.angle > 0.0);
        assert!((candidate.angle - expected).abs() < 1e-2, "got {}", candidate.angle);
    }

    #[test]
    fn selection_does_not_depend_on_candidate_order() {
        let tick = TickSegment {
            a: Point::new(0.0, 0.0),
            b: Point::new(0.0, 6.0),
        };
        let candidate = |angle: f64, distance: f32| CandidateLink {
            source: tick,
            target: Point::new(distance, 0.0),
            distance,
            angle,
        };
        let all = [
            candidate(180.0, 100.0),
            candidate(179.6, 50.0),
            candidate(179.2, 10.0),
        ];
        let mut reversed = all;
        reversed.reverse();
        let forward = best_candidate(&all).expect("finite candidates");
        let backward = best_candidate(&reversed).expect("finite candidates");
        assert_eq!(forward.angle, 180.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn straighter_candidate_beats_shorter_one() {
        let tick = TickSegment {
            a: Point::new(0.0, 10.0),
            b: Point::new(0.0, 16.0),
        };
        let straight = score_candidate(tick, Point::new(0.0, 200.0));
        let slanted = score_candidate(tick, Point::new(30.0, 40.0));
        assert!(straight.angle > slanted.angle);
        assert!(straight.distance > slanted.distance);
        assert!(candidate_better(&straight, &slanted));
        assert!(!candidate_better(&slanted, &straight));
    }

    #[test]
    fn degenerate_boundary_and_box_do_not_panic() {
        let boundary = AnchorBoundary::new(100.0, 100.0, 100.0, 100.0);
        let link = find_best_link(
            Point::new(100.0, 100.0),
            &boundary,
            Some(Size::new(0.0, 0.0)),
            &identity(),
            &LinkConfig {
                side_length: 0.0,
                shift: 0.0,
            },
        );
        let link = link.expect("zero-length ticks still produce a path");
        assert!(link.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn scores_use_nearest_tick_end() {
        let tick = TickSegment {
            a: Point::new(0.0, 0.0),
            b: Point::new(0.0, 6.0),
        };
        let candidate = score_candidate(tick, Point::new(0.0, 26.0));
        assert_eq!(candidate.distance, 20.0);
        assert!((candidate.angle - 180.0).abs() < 1e-2);
    }

    #[test]
    fn drag_deltas_move_known_labels_only() {
        let mut positions = LabelPositions::new();
        positions.set("z1", Point::new(10.0, 10.0));
        assert_eq!(positions.apply_delta("z1", 5.0, -2.0), Some(Point::new(15.0, 8.0)));
        assert_eq!(positions.apply_delta("missing", 1.0, 1.0), None);
        assert_eq!(positions.get("z1"), Some(Point::new(15.0, 8.0)));
        assert_eq!(positions.get("missing"), None);
    }

    #[test]
    fn resolve_links_follows_moved_positions() {
        let labels = vec![
            LinkLabel {
                id: "z1".to_string(),
                position: Point::new(100.0, 100.0),
                boundary: AnchorBoundary::new(90.0, 110.0, 300.0, 340.0),
                size: Some(label_box()),
                text: None,
            },
            LinkLabel {
                id: "z2".to_string(),
                position: Point::new(500.0, 500.0),
                boundary: AnchorBoundary::new(0.0, 10.0, 0.0, 10.0),
                size: None,
                text: None,
            },
        ];
        let mut positions = LabelPositions::from_labels(&labels);
        // drag z1 below its region
        positions.apply_delta("z1", 0.0, 400.0);
        let links = resolve_links(
            &labels,
            &positions,
            &identity(),
            &LinkConfig::default(),
            |label| label.size,
        );
        assert_eq!(links.len(), 2);
        let z1 = links["z1"].expect("measured");
        assert_eq!(z1.a, Point::new(100.0, 485.0));
        assert_eq!(z1.target, Point::new(100.0, 340.0));
        assert!(links["z2"].is_none());
    }
}
