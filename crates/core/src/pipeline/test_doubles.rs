//! Stub collaborators shared by the use-case tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::overlay::domain::composite_command::OverlayRequest;
use crate::overlay::domain::compositor::{CompositeError, Compositor};
use crate::publish::domain::publisher::{PublishError, Publisher};
use crate::shared::bounding_box::BoundingBox;

pub struct StubDetector {
    faces: Vec<BoundingBox>,
    fail: bool,
    pub calls: Arc<Mutex<Vec<usize>>>,
}

impl StubDetector {
    pub fn with_faces(faces: Vec<BoundingBox>) -> Self {
        Self {
            faces,
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_faces(Vec::new())
        }
    }
}

impl FaceDetector for StubDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<BoundingBox>, DetectionError> {
        self.calls.lock().unwrap().push(image.len());
        if self.fail {
            return Err(DetectionError::Service("service unavailable".into()));
        }
        Ok(self.faces.clone())
    }
}

/// Records each request and writes a placeholder GIF at the destination.
pub struct RecordingCompositor {
    fail: bool,
    undeletable_output: bool,
    pub requests: Arc<Mutex<Vec<OverlayRequest>>>,
}

impl RecordingCompositor {
    pub fn new() -> Self {
        Self {
            fail: false,
            undeletable_output: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Succeeds, but leaves a non-empty directory at the destination so
    /// removing the composite afterwards fails.
    pub fn with_undeletable_output() -> Self {
        Self {
            undeletable_output: true,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl Compositor for RecordingCompositor {
    async fn composite(&self, request: &OverlayRequest) -> Result<PathBuf, CompositeError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            // Leave a partial artifact behind to prove cleanup still happens.
            std::fs::write(&request.destination, b"partial").unwrap();
            return Err(CompositeError::Exit {
                program: "convert".into(),
                code: Some(1),
                stderr: "convert: no decode delegate".into(),
            });
        }
        if self.undeletable_output {
            std::fs::create_dir(&request.destination).unwrap();
            std::fs::write(request.destination.join("frame-0.gif"), b"GIF89a").unwrap();
            return Ok(request.destination.clone());
        }
        std::fs::write(&request.destination, b"GIF89a").unwrap();
        Ok(request.destination.clone())
    }
}

/// Records `(path, key, file existed at publish time)` per call.
pub struct RecordingPublisher {
    fail: bool,
    pub published: Arc<Mutex<Vec<(PathBuf, String, bool)>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            fail: false,
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl Publisher for RecordingPublisher {
    async fn publish(&self, file: &Path, key: &str) -> Result<String, PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((file.to_path_buf(), key.to_string(), file.exists()));
        if self.fail {
            return Err(PublishError::Upload("access denied".into()));
        }
        Ok(format!("https://bucket.s3.us-east-1.amazonaws.com/{key}"))
    }
}

/// Writes a small JPEG and returns its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}
