use std::path::PathBuf;
use std::time::Instant;

use uuid::Uuid;

use crate::detection::domain::face_detector::FaceDetector;
use crate::overlay::domain::compositor::Compositor;
use crate::pipeline::overlay_faces_use_case::{elapsed_ms, OverlayFacesUseCase, OverlayJob};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::upload_intake::UploadIntake;
use crate::publish::domain::publisher::Publisher;
use crate::shared::config::ServiceConfig;
use crate::shared::constants::OUTPUT_EXTENSION;
use crate::shared::error::{OverlayError, UploadResponse};
use crate::shared::resize_factor::ResizeFactor;
use crate::shared::scratch_file::ScratchFile;

/// What a caller hands in: the uploaded file (if any) and the resize factor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadRequest {
    pub file: Option<PathBuf>,
    pub resize: ResizeFactor,
}

/// Full request handling: intake → overlay → publish → cleanup.
///
/// Holds no per-request state, so one instance can serve many concurrent
/// requests. Scratch files are removed whether the request succeeds or not,
/// and a failed removal is only logged.
pub struct TomifyUploadUseCase<D, C, P> {
    overlay: OverlayFacesUseCase<D, C>,
    publisher: P,
    intake: UploadIntake,
}

impl<D: FaceDetector, C: Compositor, P: Publisher> TomifyUploadUseCase<D, C, P> {
    pub fn new(detector: D, compositor: C, publisher: P, config: &ServiceConfig) -> Self {
        Self {
            overlay: OverlayFacesUseCase::new(detector, compositor, config.overlay_asset.clone()),
            publisher,
            intake: UploadIntake::new(config.scratch_dir.clone(), config.max_upload_bytes),
        }
    }

    pub async fn execute(
        &self,
        request: &UploadRequest,
        logger: &mut dyn PipelineLogger,
    ) -> Result<UploadResponse, OverlayError> {
        let request_id = Uuid::new_v4();
        let upload = self
            .intake
            .accept(request.file.as_deref(), request_id)
            .await?;

        let key = format!("{request_id}.{OUTPUT_EXTENSION}");
        let composite = ScratchFile::new(self.intake.scratch_dir().join(&key));

        let result = self
            .run(&upload, &composite, &key, request.resize, logger)
            .await;

        release(upload);
        release(composite);
        logger.summary();
        result
    }

    async fn run(
        &self,
        upload: &ScratchFile,
        composite: &ScratchFile,
        key: &str,
        resize: ResizeFactor,
        logger: &mut dyn PipelineLogger,
    ) -> Result<UploadResponse, OverlayError> {
        let job = OverlayJob {
            source: upload.path().to_path_buf(),
            destination: composite.path().to_path_buf(),
            resize,
        };
        let output = self.overlay.execute(&job, logger).await?;

        let started = Instant::now();
        let url = self.publisher.publish(&output, key).await?;
        logger.timing("publish", elapsed_ms(started));
        logger.info(&format!("published {url}"));

        Ok(UploadResponse { url })
    }
}

fn release(file: ScratchFile) {
    if let Err(e) = file.remove() {
        log::warn!("cleanup failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::{LogPipelineLogger, NullPipelineLogger};
    use crate::pipeline::pipeline_stage::PipelineStage;
    use crate::pipeline::test_doubles::{
        write_jpeg, RecordingCompositor, RecordingPublisher, StubDetector,
    };
    use crate::shared::bounding_box::BoundingBox;
    use tempfile::TempDir;

    struct Fixture {
        uploads: TempDir,
        scratch: TempDir,
        config: ServiceConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let uploads = TempDir::new().unwrap();
            let scratch = TempDir::new().unwrap();
            let config = ServiceConfig {
                overlay_asset: PathBuf::from("/assets/tom-wiggle.gif"),
                scratch_dir: scratch.path().to_path_buf(),
                ..ServiceConfig::new("bucket")
            };
            Self {
                uploads,
                scratch,
                config,
            }
        }

        fn photo(&self) -> UploadRequest {
            UploadRequest {
                file: Some(write_jpeg(self.uploads.path(), "group.jpg", 640, 480)),
                resize: ResizeFactor::default(),
            }
        }

        fn scratch_is_empty(&self) -> bool {
            std::fs::read_dir(self.scratch.path()).unwrap().count() == 0
        }
    }

    fn two_faces() -> StubDetector {
        StubDetector::with_faces(vec![
            BoundingBox::new(0.2, 0.1, 0.2, 0.15),
            BoundingBox::new(0.3, 0.6, 0.25, 0.2),
        ])
    }

    #[tokio::test]
    async fn test_two_faces_end_to_end() {
        let fx = Fixture::new();
        let compositor = RecordingCompositor::new();
        let requests = compositor.requests.clone();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(two_faces(), compositor, publisher, &fx.config);

        let mut logger = LogPipelineLogger::new("e2e");
        let response = uc.execute(&fx.photo(), &mut logger).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].commands.len(), 2);

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (path, key, existed) = &published[0];
        assert!(*existed, "composite must exist when published");
        assert_eq!(path, &requests[0].destination);
        assert!(key.ends_with(".gif"));
        assert_eq!(
            response.url,
            format!("https://bucket.s3.us-east-1.amazonaws.com/{key}")
        );

        assert!(fx.scratch_is_empty(), "upload copy and composite are removed");
        assert_eq!(logger.current_stage(), Some(PipelineStage::Done));
        assert!(logger.timings_for("publish").is_some());
    }

    #[tokio::test]
    async fn test_composite_named_after_key() {
        let fx = Fixture::new();
        let compositor = RecordingCompositor::new();
        let requests = compositor.requests.clone();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(two_faces(), compositor, publisher, &fx.config);

        uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap();

        let requests = requests.lock().unwrap();
        let published = published.lock().unwrap();
        let key = &published[0].1;
        assert_eq!(requests[0].destination, fx.scratch.path().join(key));
        let stem = requests[0].source.file_stem().unwrap().to_str().unwrap();
        assert_eq!(format!("{stem}.gif"), *key);
    }

    #[tokio::test]
    async fn test_no_faces_is_client_fault_and_cleans_up() {
        let fx = Fixture::new();
        let compositor = RecordingCompositor::new();
        let requests = compositor.requests.clone();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(
            StubDetector::with_faces(vec![]),
            compositor,
            publisher,
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert!(matches!(err, OverlayError::NoFacesDetected));
        assert_eq!(err.status_code(), 400);
        assert!(requests.lock().unwrap().is_empty());
        assert!(published.lock().unwrap().is_empty());
        assert!(fx.scratch_is_empty());
    }

    #[tokio::test]
    async fn test_compositor_failure_skips_publish_and_cleans_up() {
        let fx = Fixture::new();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(
            two_faces(),
            RecordingCompositor::failing(),
            publisher,
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert!(matches!(err, OverlayError::Compositing(_)));
        assert_eq!(err.status_code(), 500);
        assert!(published.lock().unwrap().is_empty());
        assert!(fx.scratch_is_empty(), "partial composite is removed");
    }

    #[tokio::test]
    async fn test_publish_failure_is_server_fault_and_cleans_up() {
        let fx = Fixture::new();
        let uc = TomifyUploadUseCase::new(
            two_faces(),
            RecordingCompositor::new(),
            RecordingPublisher::failing(),
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert!(matches!(err, OverlayError::Publish(_)));
        assert_eq!(err.status_code(), 500);
        assert!(fx.scratch_is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_mask_success() {
        let fx = Fixture::new();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(
            two_faces(),
            RecordingCompositor::with_undeletable_output(),
            publisher,
            &fx.config,
        );

        let response = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap();

        let published = published.lock().unwrap();
        let (composite, key, _) = &published[0];
        assert_eq!(
            response.url,
            format!("https://bucket.s3.us-east-1.amazonaws.com/{key}")
        );
        // The composite could not be removed; the upload copy still was.
        assert!(composite.is_dir());
        assert_eq!(std::fs::read_dir(fx.scratch.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_mask_publish_error() {
        let fx = Fixture::new();
        let uc = TomifyUploadUseCase::new(
            two_faces(),
            RecordingCompositor::with_undeletable_output(),
            RecordingPublisher::failing(),
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert!(matches!(err, OverlayError::Publish(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_detection_failure_is_server_fault() {
        let fx = Fixture::new();
        let uc = TomifyUploadUseCase::new(
            StubDetector::failing(),
            RecordingCompositor::new(),
            RecordingPublisher::new(),
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert!(matches!(err, OverlayError::Detection(_)));
        assert_eq!(err.status_code(), 500);
        assert!(fx.scratch_is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_never_calls_detector() {
        let fx = Fixture::new();
        let detector = two_faces();
        let calls = detector.calls.clone();
        let uc = TomifyUploadUseCase::new(
            detector,
            RecordingCompositor::new(),
            RecordingPublisher::new(),
            &fx.config,
        );

        let err = uc
            .execute(&UploadRequest::default(), &mut NullPipelineLogger)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "No file uploaded");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let mut fx = Fixture::new();
        fx.config.max_upload_bytes = 10;
        let detector = two_faces();
        let calls = detector.calls.clone();
        let uc = TomifyUploadUseCase::new(
            detector,
            RecordingCompositor::new(),
            RecordingPublisher::new(),
            &fx.config,
        );

        let err = uc.execute(&fx.photo(), &mut NullPipelineLogger).await.unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(err.user_message().starts_with("File is greater than"));
        assert!(calls.lock().unwrap().is_empty());
        assert!(fx.scratch_is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests_use_distinct_names() {
        let fx = Fixture::new();
        let publisher = RecordingPublisher::new();
        let published = publisher.published.clone();
        let uc = TomifyUploadUseCase::new(
            two_faces(),
            RecordingCompositor::new(),
            publisher,
            &fx.config,
        );
        let first = fx.photo();
        let second = fx.photo();

        let mut log_a = NullPipelineLogger;
        let mut log_b = NullPipelineLogger;
        let (a, b) = tokio::join!(
            uc.execute(&first, &mut log_a),
            uc.execute(&second, &mut log_b)
        );

        assert_ne!(a.unwrap().url, b.unwrap().url);
        let published = published.lock().unwrap();
        assert_ne!(published[0].1, published[1].1);
        assert!(fx.scratch_is_empty());
    }
}
