//! Rasterization of samples and grids into pixel buffers
//!
//! Each render call owns its own accumulation buffer; nothing is cached
//! between calls.

mod accumulation;
mod encode;
mod height_map;
mod pixels;
mod point;
mod projection;
mod water_overlay;

pub use accumulation::AccumulationBuffer;
pub use encode::PixelEncoder;
pub use height_map::render_height_map;
pub use pixels::{PixelBuffer, PixelFormat};
pub use point::{bounds_of, RasterPoint};
pub use projection::Projection;
pub use water_overlay::{blend_water, render_water_overlay};
