/// Overlay size relative to the detected face, before the per-request resize.
pub const MAGNIFICATION: f64 = 1.75;

/// Largest accepted upload (5 MB).
pub const MAX_UPLOAD_BYTES: u64 = 5_000_000;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_COMPOSITOR_PROGRAM: &str = "convert";
pub const DEFAULT_OVERLAY_ASSET: &str = "assets/tom-wiggle.gif";

pub const OUTPUT_EXTENSION: &str = "gif";
pub const OUTPUT_CONTENT_TYPE: &str = "image/gif";
