use crate::shared::bounding_box::{BoundingBox, ImageDimensions};
use crate::shared::constants::MAGNIFICATION;
use crate::shared::resize_factor::ResizeFactor;

/// Where one overlay lands on the base image, in whole pixels.
///
/// `x`/`y` are the overlay's top-left corner and go negative when the
/// overlay hangs off the top or left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementSpec {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Maps each normalized face box to an overlay placement centered on it.
///
/// Output is one spec per face, in input order. An empty input yields an
/// empty output; whether that is an error is the caller's decision.
pub fn compute_placements(
    faces: &[BoundingBox],
    resize: ResizeFactor,
    dims: ImageDimensions,
) -> Vec<PlacementSpec> {
    faces
        .iter()
        .map(|face| place_one(face, resize, dims))
        .collect()
}

fn place_one(face: &BoundingBox, resize: ResizeFactor, dims: ImageDimensions) -> PlacementSpec {
    let image_w = f64::from(dims.width);
    let image_h = f64::from(dims.height);

    let left = face.left * image_w;
    let top = face.top * image_h;
    let width = face.width * image_w;
    let height = face.height * image_h;

    let center_x = left + width / 2.0;
    let center_y = top + height / 2.0;

    let overlay_w = truncate(resize.value() * (width * MAGNIFICATION));
    let overlay_h = truncate(resize.value() * (height * MAGNIFICATION));

    // Half extents use integer halving (175 → 87), so a 175px overlay on a
    // center of 550 lands at 463.
    PlacementSpec {
        x: truncate(center_x - (overlay_w / 2) as f64),
        y: truncate(center_y - (overlay_h / 2) as f64),
        width: overlay_w,
        height: overlay_h,
    }
}

/// Drops the fractional part, rounding toward zero.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
