//! Lazily loaded detector handle shared across assessments.
//!
//! The first caller triggers the load; concurrent callers wait on that same
//! in-flight load instead of starting their own. A failed load leaves the
//! handle empty so a later call can try again.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{DetectError, Detector};

pub type LoadFuture = BoxFuture<'static, anyhow::Result<Arc<dyn Detector>>>;

/// Produces the detector. Called at most once per successful load.
pub type DetectorLoader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

#[derive(Clone)]
pub struct SharedDetector {
    cell: Arc<OnceCell<Arc<dyn Detector>>>,
    loader: DetectorLoader,
}

impl fmt::Debug for SharedDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDetector")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl SharedDetector {
    pub fn new(loader: DetectorLoader) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            loader,
        }
    }

    pub fn from_fn<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn Detector>>> + Send + 'static,
    {
        Self::new(Arc::new(move || -> LoadFuture { Box::pin(load()) }))
    }

    /// Wrap an already constructed detector.
    pub fn ready(detector: Arc<dyn Detector>) -> Self {
        let loaded = detector.clone();
        Self {
            cell: Arc::new(OnceCell::new_with(Some(detector))),
            loader: Arc::new(move || -> LoadFuture {
                let detector = loaded.clone();
                Box::pin(async move { Ok(detector) })
            }),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the detector, loading it first if needed.
    pub async fn get(&self) -> Result<Arc<dyn Detector>, DetectError> {
        let detector = self
            .cell
            .get_or_try_init(|| async {
                let detector = (self.loader)().await?;
                info!("detection model loaded");
                Ok::<_, anyhow::Error>(detector)
            })
            .await
            .map_err(|e| {
                warn!(error = %format!("{e:#}"), "detection model failed to load");
                DetectError::Unavailable(format!("{e:#}"))
            })?;
        Ok(detector.clone())
    }

    /// Start loading without waiting for a result. Errors are logged by [`get`](Self::get).
    pub fn preload(&self) {
        let handle = self.clone();
        tokio::spawn(async move {
            let _ = handle.get().await;
        });
    }
}
