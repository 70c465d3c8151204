use std::path::PathBuf;
use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::overlay::domain::composite_command::{build_command, OverlayRequest};
use crate::overlay::domain::compositor::Compositor;
use crate::overlay::domain::placement::compute_placements;
use crate::overlay::infrastructure::image_dimensions::read_dimensions;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::pipeline_stage::PipelineStage;
use crate::shared::error::OverlayError;
use crate::shared::resize_factor::ResizeFactor;

/// One unit of overlay work: which image, where the result goes, how big.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub resize: ResizeFactor,
}

/// Overlay pipeline: read → detect → place → composite.
///
/// Each collaborator is called at most once per job. Zero faces stops the
/// run before compositing with [`OverlayError::NoFacesDetected`].
pub struct OverlayFacesUseCase<D, C> {
    detector: D,
    compositor: C,
    overlay_asset: PathBuf,
}

impl<D: FaceDetector, C: Compositor> OverlayFacesUseCase<D, C> {
    pub fn new(detector: D, compositor: C, overlay_asset: impl Into<PathBuf>) -> Self {
        Self {
            detector,
            compositor,
            overlay_asset: overlay_asset.into(),
        }
    }

    /// Runs the job and returns the path of the composed image.
    pub async fn execute(
        &self,
        job: &OverlayJob,
        logger: &mut dyn PipelineLogger,
    ) -> Result<PathBuf, OverlayError> {
        logger.stage(PipelineStage::ReceivedImage);
        let result = self.run(job, logger).await;
        match &result {
            Ok(_) => logger.stage(PipelineStage::Done),
            Err(e) => {
                logger.info(&format!("overlay failed: {e}"));
                logger.stage(PipelineStage::Failed);
            }
        }
        result
    }

    async fn run(
        &self,
        job: &OverlayJob,
        logger: &mut dyn PipelineLogger,
    ) -> Result<PathBuf, OverlayError> {
        let image = tokio::fs::read(&job.source).await?;
        let dims = read_dimensions(&image)?;

        logger.stage(PipelineStage::Detecting);
        let started = Instant::now();
        let faces = self.detector.detect(&image).await?;
        logger.timing("detect", elapsed_ms(started));
        if faces.is_empty() {
            return Err(OverlayError::NoFacesDetected);
        }
        logger.info(&format!(
            "{} face(s) detected in {}x{} image",
            faces.len(),
            dims.width,
            dims.height
        ));

        let placements = compute_placements(&faces, job.resize, dims);
        logger.stage(PipelineStage::PlacementComputed);

        let request = OverlayRequest {
            source: job.source.clone(),
            destination: job.destination.clone(),
            commands: placements
                .iter()
                .map(|p| build_command(p, &self.overlay_asset))
                .collect(),
        };

        logger.stage(PipelineStage::Compositing);
        let started = Instant::now();
        let output = self.compositor.composite(&request).await?;
        logger.timing("composite", elapsed_ms(started));

        Ok(output)
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
