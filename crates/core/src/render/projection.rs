//! World-to-pixel mapping
//!
//! A single uniform scale keeps the aspect ratio: the longer axis fills the
//! image and the other leaves unused space. Y is flipped so north is up.

use crate::cloud::BoundingBox;
use crate::error::{Result, WatershedError};

/// Aspect-preserving projection of a bounding box onto a `width x height` image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_x: f64,
    min_y: f64,
    scale: f64,
    width: usize,
    height: usize,
}

impl Projection {
    /// `scale = min((W-1)/x_extent, (H-1)/y_extent)`
    ///
    /// # Errors
    /// Returns [`WatershedError::Render`] if either image side is below 2
    /// pixels or the box has zero (or non-finite) extent on either axis.
    pub fn fit(bounds: &BoundingBox, width: usize, height: usize) -> Result<Self> {
        if width < 2 || height < 2 {
            return Err(WatershedError::Render(format!(
                "image must be at least 2x2 pixels, got {width}x{height}"
            )));
        }
        let (x_extent, y_extent) = (bounds.x_extent(), bounds.y_extent());
        if bounds.is_degenerate() || !x_extent.is_finite() || !y_extent.is_finite() {
            return Err(WatershedError::Render(format!(
                "bounding box has zero extent ({x_extent} x {y_extent})"
            )));
        }

        let scale = ((width - 1) as f64 / x_extent).min((height - 1) as f64 / y_extent);
        Ok(Projection {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            scale,
            width,
            height,
        })
    }

    /// Pixels per world unit
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel (column, row) for a world position, `None` if it falls outside.
    #[inline]
    pub fn project(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let px = ((x - self.min_x) * self.scale).round();
        let offset_y = ((y - self.min_y) * self.scale).round();
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        if !(0.0..=max_x).contains(&px) || !(0.0..=max_y).contains(&offset_y) {
            return None;
        }
        Some((px as usize, (max_y - offset_y) as usize))
    }
}
