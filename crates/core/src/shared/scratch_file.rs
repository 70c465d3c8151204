use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed to remove {path}: {source}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Owns a request-scoped temp path and deletes it when released or dropped.
///
/// The file does not need to exist yet: a destination reserved before the
/// compositor runs is removed only if something was written there.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    released: bool,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file now. An already-absent file counts as removed.
    pub fn remove(mut self) -> Result<(), CleanupError> {
        self.released = true;
        remove_if_present(&self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_if_present(&self.path) {
            log::warn!("{e}");
        }
    }
}

fn remove_if_present(path: &Path) -> Result<(), CleanupError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CleanupError {
            path: path.to_path_buf(),
            source,
        }),
    }
}
