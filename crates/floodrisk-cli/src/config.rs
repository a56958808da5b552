//! Runtime settings: flags with environment fallbacks, turned into collaborators.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use floodrisk_ai::{Detector, SharedDetector, SidecarDetector};
use floodrisk_assess::{AssessConfig, Assessor};
use floodrisk_core::AnalysisModel;
use floodrisk_remote::{AnalysisClient, RemoteConfig, RetryPolicy};
use floodrisk_store::HistoryStore;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Remote image analysis endpoint
    #[arg(long, env = "FLOODRISK_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Seconds before a remote request is abandoned
    #[arg(long, env = "FLOODRISK_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Directory of precomputed detection files for local detection
    #[arg(long, env = "FLOODRISK_DETECTIONS_DIR", global = true)]
    pub detections_dir: Option<PathBuf>,

    /// History file (JSON lines)
    #[arg(
        long,
        env = "FLOODRISK_HISTORY",
        default_value = "floodrisk-history.jsonl",
        global = true
    )]
    pub history: PathBuf,

    /// Append every assessment to the history file
    #[arg(
        long,
        env = "FLOODRISK_AUTO_SAVE",
        default_value_t = true,
        action = clap::ArgAction::Set,
        global = true
    )]
    pub auto_save: bool,

    /// Print results as JSON instead of a card
    #[arg(long, global = true)]
    pub json: bool,
}

impl Settings {
    fn assess_config(model: AnalysisModel) -> AssessConfig {
        AssessConfig {
            retry: RetryPolicy::default(),
            model,
        }
    }

    /// Manual scoring needs no collaborators.
    pub fn manual_assessor(&self, model: AnalysisModel) -> Assessor {
        Assessor::new(Self::assess_config(model))
    }

    /// Wires the remote client and detector, and starts loading the detector
    /// in the background. Must be called inside a tokio runtime.
    pub fn image_assessor(&self, model: AnalysisModel) -> anyhow::Result<Assessor> {
        let mut assessor = Assessor::new(Self::assess_config(model));

        if let Some(endpoint) = &self.endpoint {
            let config =
                RemoteConfig::new(endpoint.as_str()).with_timeout(Duration::from_secs(self.timeout_secs));
            let client = AnalysisClient::new(config).context("build remote analysis client")?;
            info!(endpoint = client.endpoint(), "remote analysis enabled");
            assessor = assessor.with_remote(Arc::new(client));
        }

        if let Some(dir) = &self.detections_dir {
            let dir = dir.clone();
            let detector = SharedDetector::from_fn(move || {
                let dir = dir.clone();
                async move {
                    let sidecar = SidecarDetector::load(&dir)?;
                    Ok::<_, anyhow::Error>(Arc::new(sidecar) as Arc<dyn Detector>)
                }
            });
            detector.preload();
            assessor = assessor.with_detector(detector);
        }

        Ok(assessor)
    }

    pub fn store(&self) -> HistoryStore {
        HistoryStore::open(&self.history)
    }
}
