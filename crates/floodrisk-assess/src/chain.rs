//! Degraded-mode controller for image assessments.

use std::fmt;

use chrono::Utc;
use floodrisk_ai::SharedDetector;
use floodrisk_core::{
    AnalysisModel, AssessmentContext, AssessmentResult, ImageInput, normalize_detections,
};
use floodrisk_remote::{AnalysisRequest, RemoteAnalyzer, RemoteError, RetryPolicy, retry};
use tracing::{info, warn};

use crate::StageError;

/// A stage that can be skipped or fail on the way to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RemoteAi,
    LocalDetection,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RemoteAi => "remote AI",
            Self::LocalDetection => "local detection",
        })
    }
}

/// Why a stage was passed over.
#[derive(Debug)]
pub struct Degradation {
    pub stage: Stage,
    pub reason: StageError,
}

#[derive(Debug)]
pub struct ChainOutcome {
    pub result: AssessmentResult,
    pub degradations: Vec<Degradation>,
}

enum ChainState {
    TryRemoteAi,
    TryLocalDetection,
    UseStaticHeuristic,
    Done(AssessmentResult),
}

/// remote AI (with retry) → local detection → static heuristic.
pub struct FallbackChain<'a> {
    remote: Option<&'a dyn RemoteAnalyzer>,
    detector: Option<&'a SharedDetector>,
    retry: RetryPolicy,
    model: AnalysisModel,
}

impl<'a> FallbackChain<'a> {
    pub fn new(retry: RetryPolicy, model: AnalysisModel) -> Self {
        Self {
            remote: None,
            detector: None,
            retry,
            model,
        }
    }

    pub fn with_remote(mut self, remote: &'a dyn RemoteAnalyzer) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_detector(mut self, detector: &'a SharedDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run to completion. Never fails; each skipped stage is recorded.
    pub async fn run(&self, image: &ImageInput, ctx: AssessmentContext) -> ChainOutcome {
        let mut degradations = Vec::new();
        let mut state = ChainState::TryRemoteAi;

        loop {
            state = match state {
                ChainState::TryRemoteAi => match self.try_remote(image, ctx).await {
                    Ok(result) => ChainState::Done(result),
                    Err(reason) => {
                        degrade(&mut degradations, Stage::RemoteAi, reason);
                        ChainState::TryLocalDetection
                    }
                },
                ChainState::TryLocalDetection => match self.try_detection(image, ctx).await {
                    Ok(result) => ChainState::Done(result),
                    Err(reason) => {
                        degrade(&mut degradations, Stage::LocalDetection, reason);
                        ChainState::UseStaticHeuristic
                    }
                },
                ChainState::UseStaticHeuristic => {
                    info!("using static heuristic placeholder");
                    ChainState::Done(AssessmentResult::degraded(ctx.region, ctx.season, Utc::now()))
                }
                ChainState::Done(result) => {
                    info!(
                        source = result.source_path().as_str(),
                        level = %result.risk_level(),
                        degraded_stages = degradations.len(),
                        "image assessment complete"
                    );
                    return ChainOutcome {
                        result,
                        degradations,
                    };
                }
            };
        }
    }

    async fn try_remote(
        &self,
        image: &ImageInput,
        ctx: AssessmentContext,
    ) -> Result<AssessmentResult, StageError> {
        let remote = self.remote.ok_or(StageError::NoRemote)?;
        info!("trying remote AI analysis");

        let request = AnalysisRequest::new(image, ctx.region, ctx.season);
        let findings = retry(&self.retry, RemoteError::is_transient, || {
            remote.analyze(&request)
        })
        .await?;

        Ok(AssessmentResult::from_remote(
            findings,
            ctx.region,
            ctx.season,
            Utc::now(),
        ))
    }

    async fn try_detection(
        &self,
        image: &ImageInput,
        ctx: AssessmentContext,
    ) -> Result<AssessmentResult, StageError> {
        let shared = self.detector.ok_or(StageError::NoDetector)?;
        info!("trying local object detection");

        let detector = shared.get().await?;
        let detections = detector.detect(image).await?;

        let signals = normalize_detections(&detections, ctx.region, ctx.season);
        Ok(AssessmentResult::from_signals(
            &signals,
            self.model,
            Utc::now(),
        ))
    }
}

fn degrade(degradations: &mut Vec<Degradation>, stage: Stage, reason: StageError) {
    warn!(%stage, error = %reason, "assessment stage failed, degrading");
    degradations.push(Degradation { stage, reason });
}
