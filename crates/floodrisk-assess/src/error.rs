use floodrisk_ai::DetectError;
use floodrisk_remote::RemoteError;
use thiserror::Error;

/// Why one stage of the image chain produced no result.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("no remote endpoint configured")]
    NoRemote,

    #[error("no detection model configured")]
    NoDetector,

    /// Retries exhausted, a permanent status, or an unreadable reply.
    #[error("remote analysis failed: {0}")]
    Upstream(#[from] RemoteError),

    #[error(transparent)]
    Detection(#[from] DetectError),
}
