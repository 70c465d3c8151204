use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::overlay::domain::composite_command::OverlayRequest;
use crate::overlay::domain::compositor::{CompositeError, Compositor};
use crate::shared::constants::DEFAULT_COMPOSITOR_PROGRAM;

/// Runs ImageMagick (`convert`, or `magick` on v7) as a subprocess.
///
/// The whole request goes through one invocation:
/// `<program> <source> <command tokens...> <destination>`.
#[derive(Clone, Debug)]
pub struct ImageMagickCompositor {
    program: String,
}

impl ImageMagickCompositor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ImageMagickCompositor {
    fn default() -> Self {
        Self::new(DEFAULT_COMPOSITOR_PROGRAM)
    }
}

impl Compositor for ImageMagickCompositor {
    async fn composite(&self, request: &OverlayRequest) -> Result<PathBuf, CompositeError> {
        let args = request.to_args();
        log::debug!("{} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CompositeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompositeError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !request.destination.exists() {
            return Err(CompositeError::MissingOutput {
                program: self.program.clone(),
                path: request.destination.clone(),
            });
        }

        Ok(request.destination.clone())
    }
}
