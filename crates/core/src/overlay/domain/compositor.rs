use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::overlay::domain::composite_command::OverlayRequest;

#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {}: {stderr}", describe_exit(.code))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("{program} reported success but wrote nothing to {path}")]
    MissingOutput { program: String, path: PathBuf },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Domain interface for the image-compositing engine.
///
/// One call applies every command in the request and returns the path of
/// the written image. No retries.
pub trait Compositor: Send + Sync {
    fn composite(
        &self,
        request: &OverlayRequest,
    ) -> impl Future<Output = Result<PathBuf, CompositeError>> + Send;
}
