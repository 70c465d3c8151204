use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use tokio::task::JoinSet;

use tomify_core::detection::infrastructure::rekognition_face_detector::RekognitionFaceDetector;
use tomify_core::overlay::infrastructure::imagemagick_compositor::ImageMagickCompositor;
use tomify_core::pipeline::pipeline_logger::LogPipelineLogger;
use tomify_core::pipeline::tomify_upload_use_case::{TomifyUploadUseCase, UploadRequest};
use tomify_core::publish::infrastructure::s3_publisher::S3Publisher;
use tomify_core::shared::config::ServiceConfig;
use tomify_core::shared::constants::{
    DEFAULT_COMPOSITOR_PROGRAM, DEFAULT_OVERLAY_ASSET, DEFAULT_REGION, MAX_UPLOAD_BYTES,
};
use tomify_core::shared::error::ErrorResponse;
use tomify_core::shared::resize_factor::ResizeFactor;

type UseCase = TomifyUploadUseCase<RekognitionFaceDetector, ImageMagickCompositor, S3Publisher>;

/// Overlay an animated graphic on every face in a photo and publish the result.
///
/// Each input is handled as its own request; results are printed one JSON
/// object per line, in input order.
#[derive(Parser)]
#[command(name = "tomify")]
struct Cli {
    /// Photos to process.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Overlay scale relative to the default (positive number).
    #[arg(long)]
    resize: Option<String>,

    /// Bucket the finished GIFs are published to.
    #[arg(long, env = "AWS_BUCKET")]
    bucket: String,

    /// AWS region for detection and storage.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Animated overlay composited onto each face.
    #[arg(long, env = "TOMIFY_OVERLAY", default_value = DEFAULT_OVERLAY_ASSET)]
    overlay: PathBuf,

    /// Directory for request-scoped temp files.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// ImageMagick executable (`convert`, or `magick` for v7).
    #[arg(long = "convert", env = "TOMIFY_CONVERT", default_value = DEFAULT_COMPOSITOR_PROGRAM)]
    compositor: String,

    /// Largest accepted upload in bytes.
    #[arg(long, default_value_t = MAX_UPLOAD_BYTES)]
    max_upload_bytes: u64,
}

impl Cli {
    fn to_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new(self.bucket.clone());
        config.region = self.region.clone();
        config.overlay_asset = self.overlay.clone();
        config.compositor_program = self.compositor.clone();
        config.max_upload_bytes = self.max_upload_bytes;
        if let Some(dir) = &self.scratch_dir {
            config.scratch_dir = dir.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    match run().await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when at least one request failed.
async fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.to_config();
    config.validate()?;

    let use_case = Arc::new(build_use_case(&config).await);

    let mut tasks = JoinSet::new();
    for (index, input) in cli.inputs.iter().enumerate() {
        let use_case = Arc::clone(&use_case);
        let input = input.clone();
        let resize = cli.resize.clone();
        tasks.spawn(async move { (index, handle(&use_case, input, resize.as_deref()).await) });
    }

    let mut results = Vec::with_capacity(cli.inputs.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _)| *index);

    let mut all_ok = true;
    for (_, (body, ok)) in results {
        println!("{body}");
        all_ok &= ok;
    }
    Ok(all_ok)
}

/// Builds the SDK clients once; every request shares them.
async fn build_use_case(config: &ServiceConfig) -> UseCase {
    let sdk = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let detector = RekognitionFaceDetector::new(aws_sdk_rekognition::Client::new(&sdk));
    let compositor = ImageMagickCompositor::new(config.compositor_program.clone());
    let publisher = S3Publisher::new(
        aws_sdk_s3::Client::new(&sdk),
        config.bucket.clone(),
        config.region.clone(),
    );
    TomifyUploadUseCase::new(detector, compositor, publisher, config)
}

/// Runs one request and renders its response body.
async fn handle(use_case: &UseCase, input: PathBuf, resize: Option<&str>) -> (String, bool) {
    let mut logger = LogPipelineLogger::new(input.display().to_string());

    let outcome = match ResizeFactor::parse(resize) {
        Ok(resize) => {
            let request = UploadRequest {
                file: Some(input),
                resize,
            };
            use_case.execute(&request, &mut logger).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) => (render(&response), true),
        Err(e) => {
            let body = ErrorResponse::from(&e);
            if e.is_client_fault() {
                log::warn!("{} {}", body.status, body.error);
            } else {
                log::error!("{} {e:?}", body.status);
            }
            (render(&body), false)
        }
    }
}

fn render(body: &impl serde::Serialize) -> String {
    serde_json::to_string(body).unwrap_or_else(|e| format!(r#"{{"status":500,"error":"{e}"}}"#))
}
