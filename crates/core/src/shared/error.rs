use serde::Serialize;
use thiserror::Error;

use crate::detection::domain::face_detector::DetectionError;
use crate::overlay::domain::compositor::CompositeError;
use crate::publish::domain::publisher::PublishError;

/// Opaque collaborator failure (SDK errors, transport errors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal error of one overlay request.
///
/// Every stage failure short-circuits the remaining stages and surfaces
/// here with its originating kind intact.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// The caller sent something unusable (no file, oversized file, bad resize).
    #[error("{0}")]
    ClientInput(String),

    #[error("No faces detected")]
    NoFacesDetected,

    #[error("face detection failed: {0}")]
    Detection(#[from] DetectionError),

    #[error("compositing failed: {0}")]
    Compositing(#[from] CompositeError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::ClientInput(_) | Self::NoFacesDetected)
    }

    /// HTTP-style status: 400 for client-correctable faults, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        if self.is_client_fault() {
            400
        } else {
            500
        }
    }

    /// Message shown to the caller. Client faults pass through verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Successful response body: `{"url": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Error response body carrying the mapped status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl From<&OverlayError> for ErrorResponse {
    fn from(err: &OverlayError) -> Self {
        Self {
            status: err.status_code(),
            error: err.user_message(),
        }
    }
}
