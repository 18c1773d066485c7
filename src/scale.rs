use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::Point;

/// Maps a data value on one axis to a pixel coordinate and back.
pub trait Projection {
    fn project(&self, value: f32) -> f32;
    fn invert(&self, pixel: f32) -> f32;
}

impl<P: Projection + ?Sized> Projection for &P {
    fn project(&self, value: f32) -> f32 {
        (**self).project(value)
    }

    fn invert(&self, pixel: f32) -> f32 {
        (**self).invert(pixel)
    }
}

/// Linear value-to-pixel mapping. The domain may be reversed, which is the
/// usual case for a chemical shift axis (high ppm on the left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: [f32; 2],
    pub range: [f32; 2],
}

impl LinearScale {
    pub fn new(domain: [f32; 2], range: [f32; 2]) -> Result<Self, LayoutError> {
        let scale = Self { domain, range };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let finite = self
            .domain
            .iter()
            .chain(self.range.iter())
            .all(|value| value.is_finite());
        if !finite {
            return Err(LayoutError::InvalidScale(
                "domain and range must be finite".to_string(),
            ));
        }
        if self.domain[0] == self.domain[1] {
            return Err(LayoutError::InvalidScale(format!(
                "empty domain [{}, {}]",
                self.domain[0], self.domain[1]
            )));
        }
        Ok(())
    }
}

impl Projection for LinearScale {
    fn project(&self, value: f32) -> f32 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        r0 + (value - d0) * (r1 - r0) / span
    }

    fn invert(&self, pixel: f32) -> f32 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (pixel - r0) * (d1 - d0) / span
    }
}

/// One projection per plot axis.
#[derive(Debug, Clone, Copy)]
pub struct PlotProjection<X, Y> {
    pub x: X,
    pub y: Y,
}

impl<X: Projection, Y: Projection> PlotProjection<X, Y> {
    pub fn new(x: X, y: Y) -> Self {
        Self { x, y }
    }

    pub fn to_pixel(&self, x: f32, y: f32) -> Point {
        Point::new(self.x.project(x), self.y.project(y))
    }

    pub fn to_value(&self, point: Point) -> (f32, f32) {
        (self.x.invert(point.x), self.y.invert(point.y))
    }
}
