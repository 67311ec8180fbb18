//! Output pixel buffer

use crate::error::{try_zeroed, Result, WatershedError};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One intensity byte per pixel
    Gray8,
    /// Red, green, blue bytes per pixel
    Rgb8,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// Row-major image, row 0 at the top. Untouched pixels are black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Black image of the given size.
    ///
    /// # Errors
    /// Returns [`WatershedError::Allocation`] if the byte buffer cannot be
    /// allocated, or [`WatershedError::Render`] if the size overflows.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(format.channels()))
            .ok_or_else(|| WatershedError::Render(format!("image {width}x{height} is too large")))?;
        Ok(PixelBuffer {
            width,
            height,
            format,
            data: try_zeroed("pixel buffer", len)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes, `width * height * channels` long
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Channel bytes of pixel (x, y), or `None` outside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.format.channels();
        let start = (y * self.width + x) * c;
        Some(&self.data[start..start + c])
    }

    pub(crate) fn put(&mut self, x: usize, y: usize, value: &[u8]) {
        let c = self.format.channels();
        debug_assert_eq!(value.len(), c);
        let start = (y * self.width + x) * c;
        self.data[start..start + c].copy_from_slice(value);
    }

    /// Expand to three channels; RGB buffers are returned unchanged.
    #[must_use]
    pub fn to_rgb8(&self) -> PixelBuffer {
        match self.format {
            PixelFormat::Rgb8 => self.clone(),
            PixelFormat::Gray8 => PixelBuffer {
                width: self.width,
                height: self.height,
                format: PixelFormat::Rgb8,
                data: self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_black() {
        let buffer = PixelBuffer::new(4, 3, PixelFormat::Rgb8).unwrap();
        assert_eq!(buffer.as_bytes().len(), 36);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_put_and_read() {
        let mut buffer = PixelBuffer::new(4, 3, PixelFormat::Gray8).unwrap();
        buffer.put(3, 2, &[200]);
        assert_eq!(buffer.pixel(3, 2), Some(&[200][..]));
        assert_eq!(buffer.as_bytes()[11], 200);
        assert_eq!(buffer.pixel(4, 0), None);
    }

    #[test]
    fn test_gray_to_rgb() {
        let mut buffer = PixelBuffer::new(2, 1, PixelFormat::Gray8).unwrap();
        buffer.put(1, 0, &[9]);
        let rgb = buffer.to_rgb8();
        assert_eq!(rgb.format(), PixelFormat::Rgb8);
        assert_eq!(rgb.as_bytes(), &[0, 0, 0, 9, 9, 9]);
    }

    #[test]
    fn test_oversized_dimensions() {
        assert!(PixelBuffer::new(usize::MAX, 2, PixelFormat::Gray8).is_err());
    }
}
