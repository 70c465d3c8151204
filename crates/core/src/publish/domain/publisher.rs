use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::error::BoxError;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("upload rejected: {0}")]
    Upload(#[source] BoxError),
}

/// Domain interface for making a finished image publicly reachable.
///
/// Returns the public location of the stored object.
pub trait Publisher: Send + Sync {
    fn publish(
        &self,
        file: &Path,
        key: &str,
    ) -> impl Future<Output = Result<String, PublishError>> + Send;
}
