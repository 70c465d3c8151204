use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{FaceDetail, Image};
use aws_sdk_rekognition::Client;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::shared::bounding_box::BoundingBox;

/// Face detection backed by AWS Rekognition `DetectFaces`.
///
/// Each call is a single request with no retry; failures surface as
/// [`DetectionError::Service`].
#[derive(Clone, Debug)]
pub struct RekognitionFaceDetector {
    client: Client,
}

impl RekognitionFaceDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FaceDetector for RekognitionFaceDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<BoundingBox>, DetectionError> {
        let output = self
            .client
            .detect_faces()
            .image(Image::builder().bytes(Blob::new(image.to_vec())).build())
            .send()
            .await
            .map_err(|e| DetectionError::Service(DisplayErrorContext(e).to_string().into()))?;

        output.face_details().iter().map(to_bounding_box).collect()
    }
}

fn to_bounding_box(face: &FaceDetail) -> Result<BoundingBox, DetectionError> {
    let bbox = face
        .bounding_box()
        .ok_or_else(|| DetectionError::MalformedResponse("face without bounding box".into()))?;

    let field = |value: Option<f32>, name: &str| {
        value
            .map(f64::from)
            .ok_or_else(|| DetectionError::MalformedResponse(format!("bounding box missing {name}")))
    };

    Ok(BoundingBox::new(
        field(bbox.top(), "top")?,
        field(bbox.left(), "left")?,
        field(bbox.height(), "height")?,
        field(bbox.width(), "width")?,
    ))
}
