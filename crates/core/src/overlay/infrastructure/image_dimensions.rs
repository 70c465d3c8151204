use std::io::Cursor;

use crate::shared::bounding_box::ImageDimensions;
use crate::shared::error::OverlayError;

/// Reads pixel dimensions from the encoded image header without decoding pixels.
///
/// Anything the `image` crate cannot identify is treated as a bad upload.
pub fn read_dimensions(image: &[u8]) -> Result<ImageDimensions, OverlayError> {
    let reader = image::ImageReader::new(Cursor::new(image)).with_guessed_format()?;
    match reader.into_dimensions() {
        Ok((width, height)) => Ok(ImageDimensions::new(width, height)),
        Err(image::ImageError::IoError(e)) => Err(OverlayError::Io(e)),
        Err(e) => {
            log::debug!("unreadable image: {e}");
            Err(OverlayError::ClientInput("Unsupported image".to_string()))
        }
    }
}
