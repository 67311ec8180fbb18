//! Grayscale elevation rendering

use super::accumulation::{intensity, AccumulationBuffer};
use super::pixels::{PixelBuffer, PixelFormat};
use super::point::{bounds_of, RasterPoint};
use super::projection::Projection;
use crate::error::{Result, WatershedError};
use tracing::debug;

/// Render mean elevation per pixel as 8-bit gray.
///
/// Samples that share a pixel are averaged; the averages are then stretched
/// so the lowest covered pixel is 0 and the highest 255. Pixels no sample
/// reaches stay black. A flat cloud renders mid-gray.
///
/// # Errors
/// Returns [`WatershedError::Render`] if `points` is empty, the image is
/// smaller than 2x2, or the points have zero planar extent, and
/// [`WatershedError::Allocation`] if buffers cannot be allocated.
pub fn render_height_map<P: RasterPoint>(
    points: &[P],
    width: usize,
    height: usize,
) -> Result<PixelBuffer> {
    let bounds = bounds_of(points)
        .ok_or_else(|| WatershedError::Render("no points to render".to_string()))?;
    let projection = Projection::fit(&bounds, width, height)?;

    let mut acc = AccumulationBuffer::new(width, height)?;
    let mut dropped = 0usize;
    for point in points {
        let (x, y) = point.position();
        match projection.project(x, y) {
            Some((px, py)) => acc.add(px, py, point.elevation(), 0.0),
            None => dropped += 1,
        }
    }
    debug!(
        "Height map {}x{}: {} points, {} outside the image",
        width,
        height,
        points.len(),
        dropped
    );

    let mut image = PixelBuffer::new(width, height, PixelFormat::Gray8)?;
    let Some((lo, hi)) = acc.height_range() else {
        return Ok(image);
    };
    for (px, py, mean, _) in acc.averages() {
        image.put(px, py, &[intensity(mean, lo, hi)]);
    }
    Ok(image)
}
