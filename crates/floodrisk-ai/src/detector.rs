use async_trait::async_trait;
use floodrisk_core::{Detection, ImageInput};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// The detection model could not be loaded.
    #[error("detection model unavailable: {0}")]
    Unavailable(String),

    #[error("detection failed: {0}")]
    Failed(String),
}

/// Given an image, produce the objects found in it.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &ImageInput) -> Result<Vec<Detection>, DetectError>;
}
