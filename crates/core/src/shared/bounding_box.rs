/// A detected face as fractions of the image width and height.
///
/// All four fields are expected in `[0, 1]`; detection services may report
/// boxes that spill slightly past the frame, which the geometry tolerates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

impl BoundingBox {
    pub fn new(top: f64, left: f64, height: f64, width: f64) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }
}

/// Pixel size of the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
