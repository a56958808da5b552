//! Flood risk decision core: signal normalisation, scoring, and recommendation tables.
//!
//! Everything in this crate is synchronous and deterministic. Network calls,
//! model loading and persistence live in the sibling crates.

pub mod assessment;
pub mod error;
pub mod image;
pub mod level;
pub mod normalize;
pub mod recommend;
pub mod score;
pub mod signals;
pub mod terrain;

pub use assessment::{AssessmentResult, DetectionSummary, RemoteFindings, SourcePath};
pub use error::ValidationError;
pub use image::{ImageInput, ImageMime, MAX_IMAGE_BYTES};
pub use level::{RiskCategory, RiskLevel, RiskScore};
pub use normalize::{Detection, ManualInput, ObjectGroup, classify_label, normalize_detections};
pub use recommend::{AnalysisModel, Basis, Guidance, ResolveContext, resolve};
pub use score::{
    DetectionOutcome, DetectionRule, Factor, ManualScore, ScoreComponent, Scored, score,
};
pub use signals::{
    AssessmentContext, DetectionCounts, DetectionSignals, ManualSignals, Measurements, Region,
    Season, SignalSet, Soil, Terrain,
};
pub use terrain::{TerrainProfile, TerrainType};
