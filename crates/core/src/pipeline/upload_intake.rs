use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::shared::error::OverlayError;
use crate::shared::scratch_file::ScratchFile;

/// Validates an upload and moves a private copy into the scratch directory.
///
/// The copy is named after the request id, so concurrent requests never
/// collide, and it is owned by a [`ScratchFile`] so it is removed on every
/// exit path.
#[derive(Clone, Debug)]
pub struct UploadIntake {
    scratch_dir: PathBuf,
    max_bytes: u64,
}

impl UploadIntake {
    pub fn new(scratch_dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            max_bytes,
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub async fn accept(
        &self,
        upload: Option<&Path>,
        request_id: Uuid,
    ) -> Result<ScratchFile, OverlayError> {
        let upload =
            upload.ok_or_else(|| OverlayError::ClientInput("No file uploaded".to_string()))?;

        let metadata = match tokio::fs::metadata(upload).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(not_found(upload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found(upload)),
            Err(e) => return Err(OverlayError::Io(e)),
        };
        if metadata.len() > self.max_bytes {
            return Err(OverlayError::ClientInput(format!(
                "File is greater than {}",
                describe_limit(self.max_bytes)
            )));
        }

        let scratch = ScratchFile::new(self.scratch_dir.join(scratch_name(upload, request_id)));
        tokio::fs::copy(upload, scratch.path()).await?;
        Ok(scratch)
    }
}

fn not_found(upload: &Path) -> OverlayError {
    OverlayError::ClientInput(format!("No file uploaded at {}", upload.display()))
}

/// `<request-id>` plus the upload's own extension, if any.
fn scratch_name(upload: &Path, request_id: Uuid) -> String {
    match upload.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{request_id}.{ext}"),
        None => request_id.to_string(),
    }
}

fn describe_limit(bytes: u64) -> String {
    if bytes % 1_000_000 == 0 {
        format!("{}Mb", bytes / 1_000_000)
    } else {
        format!("{bytes} bytes")
    }
}
