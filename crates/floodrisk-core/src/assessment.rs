//! The immutable record an assessment produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::RiskLevel;
use crate::recommend::{AnalysisModel, Basis, ResolveContext, resolve};
use crate::score::{ScoreComponent, Scored, score};
use crate::signals::{DetectionCounts, Measurements, Region, Season, SignalSet};
use crate::terrain::TerrainProfile;

/// Which stage of the pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourcePath {
    Manual,
    ImageAi,
    ImageDetection,
    Fallback,
}

impl SourcePath {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::ImageAi => "image-ai",
            Self::ImageDetection => "image-detection",
            Self::Fallback => "fallback",
        }
    }
}

/// What the detector saw, kept alongside detection-path results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub counts: DetectionCounts,
    pub terrain: TerrainProfile,
    pub objects: Vec<String>,
}

/// Validated structured reply from the remote analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFindings {
    pub level: RiskLevel,
    pub probability: String,
    pub elevation: Option<String>,
    pub distance_from_water: Option<String>,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

const DEGRADED_PROBABILITY: &str = "45%";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    risk_level: RiskLevel,
    risk_probability: String,
    elevation_estimate: Option<String>,
    distance_from_water_estimate: Option<String>,
    narrative: String,
    recommendations: Vec<String>,
    produced_at: DateTime<Utc>,
    source_path: SourcePath,
    region: Region,
    season: Season,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detection: Option<DetectionSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    score_breakdown: Vec<ScoreComponent>,
}

impl AssessmentResult {
    /// Score a signal set and resolve its advice in one step.
    pub fn from_signals(
        signals: &SignalSet,
        model: AnalysisModel,
        produced_at: DateTime<Utc>,
    ) -> Self {
        let scored = score(signals);
        let level = scored.level();
        let probability = scored.probability();

        let (basis, source_path, detection, score_breakdown) = match (&scored, &signals.measurements) {
            (Scored::Manual(manual), _) => (
                Basis::Manual,
                SourcePath::Manual,
                None,
                manual.components.clone(),
            ),
            (Scored::Detection(outcome), Measurements::Detection(d)) => (
                Basis::Detection(outcome.rule),
                SourcePath::ImageDetection,
                Some(summarize(&d.counts, &d.objects)),
                Vec::new(),
            ),
            (Scored::NotTerrain, Measurements::Detection(d)) => (
                Basis::NotTerrain,
                SourcePath::ImageDetection,
                Some(summarize(&d.counts, &d.objects)),
                Vec::new(),
            ),
            // Scoring maps each measurement kind to its own variants.
            (_, Measurements::Manual(_)) => {
                (Basis::Manual, SourcePath::Manual, None, Vec::new())
            }
        };

        let guidance = resolve(
            level,
            &ResolveContext {
                region: signals.region,
                season: signals.season,
                model,
                basis,
            },
        );

        let (elevation_estimate, distance_from_water_estimate) = detection
            .as_ref()
            .map(|d| (d.terrain.elevation.clone(), d.terrain.distance_from_water.clone()))
            .unwrap_or_default();

        Self {
            risk_level: level,
            risk_probability: probability,
            elevation_estimate,
            distance_from_water_estimate,
            narrative: guidance.narrative,
            recommendations: guidance.recommendations,
            produced_at,
            source_path,
            region: signals.region,
            season: signals.season,
            detection,
            score_breakdown,
        }
    }

    /// Fixed Moderate placeholder used when no richer source succeeded.
    pub fn degraded(region: Region, season: Season, produced_at: DateTime<Utc>) -> Self {
        let guidance = resolve(
            RiskLevel::MODERATE,
            &ResolveContext {
                region,
                season,
                model: AnalysisModel::Standard,
                basis: Basis::Degraded,
            },
        );
        Self {
            risk_level: RiskLevel::MODERATE,
            risk_probability: DEGRADED_PROBABILITY.to_string(),
            elevation_estimate: None,
            distance_from_water_estimate: None,
            narrative: guidance.narrative,
            recommendations: guidance.recommendations,
            produced_at,
            source_path: SourcePath::Fallback,
            region,
            season,
            detection: None,
            score_breakdown: Vec::new(),
        }
    }

    pub fn from_remote(
        findings: RemoteFindings,
        region: Region,
        season: Season,
        produced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            risk_level: findings.level,
            risk_probability: findings.probability,
            elevation_estimate: known(findings.elevation),
            distance_from_water_estimate: known(findings.distance_from_water),
            narrative: findings.analysis,
            recommendations: findings.recommendations,
            produced_at,
            source_path: SourcePath::ImageAi,
            region,
            season,
            detection: None,
            score_breakdown: Vec::new(),
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn risk_probability(&self) -> &str {
        &self.risk_probability
    }

    pub fn elevation_estimate(&self) -> Option<&str> {
        self.elevation_estimate.as_deref()
    }

    pub fn distance_from_water_estimate(&self) -> Option<&str> {
        self.distance_from_water_estimate.as_deref()
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }

    pub fn source_path(&self) -> SourcePath {
        self.source_path
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn detection(&self) -> Option<&DetectionSummary> {
        self.detection.as_ref()
    }

    /// Per-factor points for manual results; empty otherwise.
    pub fn score_breakdown(&self) -> &[ScoreComponent] {
        &self.score_breakdown
    }

    pub fn is_degraded(&self) -> bool {
        self.source_path == SourcePath::Fallback
    }
}

fn summarize(counts: &DetectionCounts, objects: &[String]) -> DetectionSummary {
    DetectionSummary {
        counts: *counts,
        terrain: TerrainProfile::infer(counts, objects.len()),
        objects: objects.to_vec(),
    }
}

/// Drop blank or "unknown" estimates.
fn known(estimate: Option<String>) -> Option<String> {
    estimate.filter(|e| {
        let e = e.trim();
        !e.is_empty() && !e.eq_ignore_ascii_case("unknown")
    })
}
