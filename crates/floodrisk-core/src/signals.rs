//! Canonical signal set consumed by the scoring engine.
//!
//! A [`SignalSet`] carries measurements from exactly one source: either the
//! manual form or an object-detection pass. The two-variant [`Measurements`]
//! enum makes the unused path unrepresentable.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::recommend::AnalysisModel;

/// Lower-case, trimmed key used when matching free-form input against enum names.
fn input_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Flat,
    Urban,
    Rural,
    #[default]
    Unknown,
}

impl Terrain {
    pub fn parse(raw: &str) -> Self {
        match input_key(raw).as_str() {
            "flat" => Self::Flat,
            "urban" => Self::Urban,
            "rural" => Self::Rural,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Urban => "urban",
            Self::Rural => "rural",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Soil {
    Saturated,
    Moist,
    Dry,
    #[default]
    Unknown,
}

impl Soil {
    pub fn parse(raw: &str) -> Self {
        match input_key(raw).as_str() {
            "saturated" => Self::Saturated,
            "moist" => Self::Moist,
            "dry" => Self::Dry,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saturated => "saturated",
            Self::Moist => "moist",
            Self::Dry => "dry",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Coastal,
    River,
    Inland,
    #[default]
    Unknown,
}

impl Region {
    pub fn parse(raw: &str) -> Self {
        match input_key(raw).as_str() {
            "coastal" => Self::Coastal,
            "river" => Self::River,
            "inland" => Self::Inland,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coastal => "coastal",
            Self::River => "river",
            Self::Inland => "inland",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Region {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    #[default]
    Unknown,
}

impl Season {
    pub fn parse(raw: &str) -> Self {
        match input_key(raw).as_str() {
            "spring" => Self::Spring,
            "summer" => Self::Summer,
            "fall" | "autumn" => Self::Fall,
            "winter" => Self::Winter,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Season {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and when an assessment is made, plus which analysis model the caller selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentContext {
    pub region: Region,
    pub season: Season,
    pub model: AnalysisModel,
}

impl AssessmentContext {
    pub fn new(region: Region, season: Season) -> Self {
        Self {
            region,
            season,
            model: AnalysisModel::default(),
        }
    }

    pub fn with_model(mut self, model: AnalysisModel) -> Self {
        self.model = model;
        self
    }
}

/// Manually entered measurements. Both numbers are validated non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualSignals {
    /// Metres above normal.
    pub water_level: f64,
    /// Millimetres.
    pub rainfall: f64,
    pub terrain: Terrain,
    pub soil: Soil,
}

/// Object counts per keyword group from a detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionCounts {
    pub water_body: u32,
    pub building: u32,
    pub vegetation: u32,
    pub vehicle: u32,
    pub person: u32,
}

impl DetectionCounts {
    fn terrain_elements(&self) -> u32 {
        self.water_body + self.vegetation + self.building
    }

    fn non_terrain_elements(&self) -> u32 {
        self.person + self.vehicle
    }

    /// False when people and vehicles dominate the frame (and there are more than two of them).
    pub fn is_terrain_image(&self) -> bool {
        let non_terrain = self.non_terrain_elements();
        !(non_terrain > self.terrain_elements() && non_terrain > 2)
    }
}

/// Detection-path signals: counts plus the raw labels they were derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSignals {
    pub counts: DetectionCounts,
    pub objects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Measurements {
    Manual(ManualSignals),
    Detection(DetectionSignals),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub measurements: Measurements,
    pub region: Region,
    pub season: Season,
}

impl SignalSet {
    pub fn manual(signals: ManualSignals, region: Region, season: Season) -> Self {
        Self {
            measurements: Measurements::Manual(signals),
            region,
            season,
        }
    }

    pub fn detection(signals: DetectionSignals, region: Region, season: Season) -> Self {
        Self {
            measurements: Measurements::Detection(signals),
            region,
            season,
        }
    }
}
