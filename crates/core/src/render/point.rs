//! Anything that can be splatted onto an image

use crate::cloud::{BoundingBox, Sample};
use crate::grid::Cell;

/// A located elevation, optionally carrying surface water.
pub trait RasterPoint {
    /// Planar (x, y) position
    fn position(&self) -> (f64, f64);

    fn elevation(&self) -> f64;

    /// Water depth; dry by default
    fn water(&self) -> f64 {
        0.0
    }
}

impl RasterPoint for Sample {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn elevation(&self) -> f64 {
        self.z
    }
}

impl RasterPoint for Cell {
    fn position(&self) -> (f64, f64) {
        (self.x(), self.y())
    }

    fn elevation(&self) -> f64 {
        Cell::elevation(self)
    }

    fn water(&self) -> f64 {
        Cell::water(self)
    }
}

/// Planar extent of `points`, `None` when empty.
pub fn bounds_of<P: RasterPoint>(points: &[P]) -> Option<BoundingBox> {
    let (x, y) = points.first()?.position();
    let init = BoundingBox {
        min_x: x,
        max_x: x,
        min_y: y,
        max_y: y,
    };
    Some(points[1..].iter().fold(init, |b, p| {
        let (x, y) = p.position();
        BoundingBox {
            min_x: b.min_x.min(x),
            max_x: b.max_x.max(x),
            min_y: b.min_y.min(y),
            max_y: b.max_y.max(y),
        }
    }))
}
