//! Signal normalizer: raw manual fields or detector output → [`SignalSet`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;
use crate::signals::{
    DetectionCounts, DetectionSignals, ManualSignals, Region, Season, SignalSet, Soil, Terrain,
};

/// Manual form fields exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualInput {
    pub water_level: Option<String>,
    pub rainfall: Option<String>,
    pub terrain: Option<String>,
    pub soil: Option<String>,
}

/// One object reported by a detection capability.
///
/// Accepts `class`/`score` as aliases so COCO-style detector output can be
/// read without reshaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(alias = "class")]
    pub label: String,
    #[serde(alias = "score", default)]
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectGroup {
    WaterBody,
    Vegetation,
    Building,
    Vehicle,
    Person,
}

/// Keyword groups in priority order. A label is assigned to the first group
/// with a keyword contained in it.
const KEYWORD_GROUPS: &[(ObjectGroup, &[&str])] = &[
    (
        ObjectGroup::WaterBody,
        &["water", "river", "lake", "ocean", "sea"],
    ),
    (
        ObjectGroup::Vegetation,
        &["tree", "plant", "grass", "vegetation"],
    ),
    (
        ObjectGroup::Building,
        &["building", "house", "skyscraper", "construction", "bridge"],
    ),
    (ObjectGroup::Vehicle, &["car", "truck", "bus", "vehicle"]),
    (ObjectGroup::Person, &["person"]),
];

/// Classify a detector label into at most one object group.
pub fn classify_label(label: &str) -> Option<ObjectGroup> {
    let label = label.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| label.contains(kw)))
        .map(|(group, _)| *group)
}

impl ManualInput {
    /// Validate and convert to a manual-path [`SignalSet`].
    ///
    /// All four fields are required. Water level and rainfall must parse as
    /// finite, non-negative numbers; terrain and soil values outside the known
    /// set are accepted as `Unknown`.
    pub fn normalize(&self, region: Region, season: Season) -> Result<SignalSet, ValidationError> {
        let water_level = parse_measurement("water level", self.water_level.as_deref())?;
        let rainfall = parse_measurement("rainfall", self.rainfall.as_deref())?;
        let terrain = Terrain::parse(required("terrain", self.terrain.as_deref())?);
        let soil = Soil::parse(required("soil", self.soil.as_deref())?);

        Ok(SignalSet::manual(
            ManualSignals {
                water_level,
                rainfall,
                terrain,
                soil,
            },
            region,
            season,
        ))
    }
}

/// Count detections per keyword group and wrap them as a detection-path [`SignalSet`].
pub fn normalize_detections(detections: &[Detection], region: Region, season: Season) -> SignalSet {
    let mut counts = DetectionCounts::default();
    let mut objects = Vec::with_capacity(detections.len());

    for detection in detections {
        objects.push(detection.label.clone());
        match classify_label(&detection.label) {
            Some(ObjectGroup::WaterBody) => counts.water_body += 1,
            Some(ObjectGroup::Vegetation) => counts.vegetation += 1,
            Some(ObjectGroup::Building) => counts.building += 1,
            Some(ObjectGroup::Vehicle) => counts.vehicle += 1,
            Some(ObjectGroup::Person) => counts.person += 1,
            None => {}
        }
    }

    debug!(?counts, total = detections.len(), "normalized detections");
    SignalSet::detection(DetectionSignals { counts, objects }, region, season)
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn parse_measurement(field: &'static str, value: Option<&str>) -> Result<f64, ValidationError> {
    let raw = required(field, value)?;
    let parsed: f64 = raw.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.to_string(),
    })?;

    if !parsed.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        });
    }
    if parsed < 0.0 {
        return Err(ValidationError::Negative {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}
