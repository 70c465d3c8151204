use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_COMPOSITOR_PROGRAM, DEFAULT_OVERLAY_ASSET, DEFAULT_REGION, MAX_UPLOAD_BYTES,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("storage bucket is not configured")]
    MissingBucket,
    #[error("overlay asset not found: {0}")]
    MissingOverlay(PathBuf),
    #[error("scratch directory not found: {0}")]
    MissingScratchDir(PathBuf),
    #[error("upload limit must be greater than zero")]
    ZeroUploadLimit,
}

/// Process-wide settings, built once at startup and handed to the use cases.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub region: String,
    pub bucket: String,
    pub overlay_asset: PathBuf,
    pub scratch_dir: PathBuf,
    pub compositor_program: String,
    pub max_upload_bytes: u64,
}

impl ServiceConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            bucket: bucket.into(),
            overlay_asset: PathBuf::from(DEFAULT_OVERLAY_ASSET),
            scratch_dir: std::env::temp_dir(),
            compositor_program: DEFAULT_COMPOSITOR_PROGRAM.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingBucket);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        if !self.overlay_asset.is_file() {
            return Err(ConfigError::MissingOverlay(self.overlay_asset.clone()));
        }
        if !self.scratch_dir.is_dir() {
            return Err(ConfigError::MissingScratchDir(self.scratch_dir.clone()));
        }
        Ok(())
    }
}
