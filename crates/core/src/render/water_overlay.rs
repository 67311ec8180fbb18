//! Terrain shading with surface water blended toward blue

use super::accumulation::{intensity, AccumulationBuffer};
use super::pixels::{PixelBuffer, PixelFormat};
use super::projection::Projection;
use crate::error::{Result, WatershedError};
use crate::grid::Grid;
use tracing::debug;

/// RGB for a terrain intensity `t` under water fraction `wf` in `[0, 1]`.
///
/// Terrain fades toward black as `wf` grows while blue rises toward 255, so a
/// saturated pixel is pure blue regardless of elevation.
#[inline]
pub fn blend_water(t: u8, wf: f64) -> [u8; 3] {
    let fade = f64::from(t) * (1.0 - wf);
    let gray = fade.round().clamp(0.0, 255.0) as u8;
    let blue = (fade + 255.0 * wf).round().clamp(0.0, 255.0) as u8;
    [gray, gray, blue]
}

/// Render the grid's terrain in gray with water depth tinted blue.
///
/// Elevation is stretched over the grid's global height range, so frames from
/// one simulation are comparable. Water depth is divided by
/// `max_water_for_scale` and clamped to `[0, 1]`.
///
/// # Errors
/// Returns [`WatershedError::Render`] if `max_water_for_scale` is not a
/// positive finite number, the image is smaller than 2x2 or the grid has zero
/// planar extent, and [`WatershedError::Allocation`] if buffers cannot be
/// allocated.
pub fn render_water_overlay(
    grid: &Grid,
    max_water_for_scale: f64,
    width: usize,
    height: usize,
) -> Result<PixelBuffer> {
    if !max_water_for_scale.is_finite() || max_water_for_scale <= 0.0 {
        return Err(WatershedError::Render(format!(
            "water scale must be positive and finite, got {max_water_for_scale}"
        )));
    }
    if grid.is_empty() {
        return Err(WatershedError::Render("grid has no cells".to_string()));
    }
    let stats = grid.statistics();
    let projection = Projection::fit(&stats.bounds, width, height)?;

    let mut acc = AccumulationBuffer::new(width, height)?;
    for cell in grid.cells() {
        if let Some((px, py)) = projection.project(cell.x(), cell.y()) {
            acc.add(px, py, cell.elevation(), cell.water());
        }
    }

    debug!(
        "Water overlay {}x{}: {} cells, water scale {}",
        width,
        height,
        grid.len(),
        max_water_for_scale
    );
    let mut image = PixelBuffer::new(width, height, PixelFormat::Rgb8)?;
    for (px, py, mean_height, mean_water) in acc.averages() {
        let t = intensity(mean_height, stats.min_height, stats.max_height);
        let wf = (mean_water / max_water_for_scale).clamp(0.0, 1.0);
        image.put(px, py, &blend_water(t, wf));
    }
    Ok(image)
}
