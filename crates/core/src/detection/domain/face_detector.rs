use std::future::Future;

use thiserror::Error;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::error::BoxError;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("detection service request failed: {0}")]
    Service(#[source] BoxError),
    #[error("malformed detection response: {0}")]
    MalformedResponse(String),
}

/// Domain interface for face detection.
///
/// Takes the raw encoded image and returns one box per face in the order
/// the service reports them. An empty list is a valid answer.
pub trait FaceDetector: Send + Sync {
    fn detect(
        &self,
        image: &[u8],
    ) -> impl Future<Output = Result<Vec<BoundingBox>, DetectionError>> + Send;
}
