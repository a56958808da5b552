use std::sync::Arc;

use chrono::Utc;
use floodrisk_ai::SharedDetector;
use floodrisk_core::{
    AnalysisModel, AssessmentContext, AssessmentResult, ImageInput, ManualInput, ValidationError,
};
use floodrisk_remote::{RemoteAnalyzer, RetryPolicy};
use tracing::info;

use crate::{ChainOutcome, FallbackChain};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssessConfig {
    pub retry: RetryPolicy,
    /// Applied when the caller's context leaves the model at its default.
    pub model: AnalysisModel,
}

/// Entry point for both assessment paths. Collaborators are injected; none
/// are required.
#[derive(Default)]
pub struct Assessor {
    remote: Option<Arc<dyn RemoteAnalyzer>>,
    detector: Option<SharedDetector>,
    config: AssessConfig,
}

impl Assessor {
    pub fn new(config: AssessConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteAnalyzer>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_detector(mut self, detector: SharedDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn config(&self) -> &AssessConfig {
        &self.config
    }

    fn model_for(&self, ctx: &AssessmentContext) -> AnalysisModel {
        if ctx.model == AnalysisModel::default() {
            self.config.model
        } else {
            ctx.model
        }
    }

    /// Validate and score manual input. Validation errors block the assessment.
    pub fn assess_manual(
        &self,
        input: &ManualInput,
        ctx: AssessmentContext,
    ) -> Result<AssessmentResult, ValidationError> {
        let signals = input.normalize(ctx.region, ctx.season)?;
        let result = AssessmentResult::from_signals(&signals, self.model_for(&ctx), Utc::now());
        info!(
            level = %result.risk_level(),
            probability = result.risk_probability(),
            "manual assessment complete"
        );
        Ok(result)
    }

    /// Assess an already validated image. Always produces a result.
    pub async fn assess_image(&self, image: &ImageInput, ctx: AssessmentContext) -> ChainOutcome {
        let mut chain = FallbackChain::new(self.config.retry, self.model_for(&ctx));
        if let Some(remote) = self.remote.as_deref() {
            chain = chain.with_remote(remote);
        }
        if let Some(detector) = self.detector.as_ref() {
            chain = chain.with_detector(detector);
        }
        chain.run(image, ctx).await
    }
}
