//! Handing finished images to an output format

use super::pixels::PixelBuffer;
use crate::error::Result;
use std::path::Path;

/// Writes a [`PixelBuffer`] to a destination in some image format.
///
/// The core never picks a format itself; the front end supplies an encoder.
/// Closures of the matching shape implement this trait too.
pub trait PixelEncoder {
    /// # Errors
    /// Implementations report failures as [`crate::WatershedError::Encode`]
    /// or [`crate::WatershedError::Io`].
    fn encode(&self, buffer: &PixelBuffer, destination: &Path) -> Result<()>;
}

impl<F> PixelEncoder for F
where
    F: Fn(&PixelBuffer, &Path) -> Result<()>,
{
    fn encode(&self, buffer: &PixelBuffer, destination: &Path) -> Result<()> {
        self(buffer, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PixelFormat;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[test]
    fn test_closure_encoder() {
        let written = RefCell::new(Vec::new());
        let encoder = |buffer: &PixelBuffer, path: &Path| -> Result<()> {
            written
                .borrow_mut()
                .push((path.to_path_buf(), buffer.as_bytes().len()));
            Ok(())
        };
        let buffer = PixelBuffer::new(2, 2, PixelFormat::Rgb8).unwrap();
        encoder.encode(&buffer, Path::new("frame0.gif")).unwrap();
        assert_eq!(written.into_inner(), vec![(PathBuf::from("frame0.gif"), 12)]);
    }
}
