// Pixel-space primitives shared by the layout passes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Angle in degrees at the vertex enclosed by `adjacent1` and `adjacent2`,
/// given the length of the side opposite that vertex (law of cosines).
///
/// Works in f64: near 0 and 180 degrees the cosine sits next to +-1 and f32
/// loses the angle entirely at plot-sized distances.
///
/// A zero-length adjacent side has no defined angle and yields `0.0`, which
/// ranks it last wherever larger angles are preferred.
pub fn triangle_angle_at_vertex(opposite: f64, adjacent1: f64, adjacent2: f64) -> f64 {
    let denom = 2.0 * adjacent1 * adjacent2;
    if !denom.is_finite() || denom <= f64::EPSILON {
        return 0.0;
    }
    let cos = (adjacent1 * adjacent1 + adjacent2 * adjacent2 - opposite * opposite) / denom;
    if cos.is_nan() {
        return 0.0;
    }
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}
