//! `image`-backed output for rendered pixel buffers

use image::RgbImage;
use std::path::Path;
use watershed_core::{PixelBuffer, PixelEncoder, WatershedError};

/// Saves buffers in the format implied by the destination extension.
///
/// Gray buffers are expanded to RGB first since GIF has no gray mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl PixelEncoder for ImageEncoder {
    fn encode(&self, buffer: &PixelBuffer, destination: &Path) -> watershed_core::Result<()> {
        let rgb = buffer.to_rgb8();
        let too_large = || {
            WatershedError::Encode(format!(
                "{}x{} exceeds the encoder's size limit",
                rgb.width(),
                rgb.height()
            ))
        };
        let width = u32::try_from(rgb.width()).map_err(|_| too_large())?;
        let height = u32::try_from(rgb.height()).map_err(|_| too_large())?;
        let image = RgbImage::from_raw(width, height, rgb.into_bytes()).ok_or_else(|| {
            WatershedError::Encode("pixel data does not match image dimensions".to_string())
        })?;
        image
            .save(destination)
            .map_err(|e| WatershedError::Encode(format!("{}: {e}", destination.display())))
    }
}
