//! Risk scoring engine.
//!
//! The manual path is an additive point budget with per-factor caps. The
//! detection path is a rule cascade in which later rules override earlier
//! ones, so evaluation order is significant.

use serde::{Deserialize, Serialize};

use crate::level::{MAX_SCORE, RiskLevel, RiskScore};
use crate::signals::{
    DetectionCounts, ManualSignals, Measurements, Region, Season, SignalSet, Soil, Terrain,
};

const WATER_LEVEL_POINTS_PER_METRE: f64 = 10.0;
const WATER_LEVEL_CAP: f64 = 40.0;
const RAINFALL_POINTS_PER_MM: f64 = 1.5;
const RAINFALL_CAP: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    WaterLevel,
    Rainfall,
    Terrain,
    Soil,
    Region,
    Season,
}

/// One factor's contribution to a manual score, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: Factor,
    pub points: f64,
    pub notes: String,
}

/// Manual-path score with the breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualScore {
    pub score: RiskScore,
    /// Sum of contributions before the 100-point clamp.
    pub raw_total: f64,
    pub components: Vec<ScoreComponent>,
}

impl ManualScore {
    pub fn level(&self) -> RiskLevel {
        self.score.category().into()
    }

    pub fn probability(&self) -> String {
        self.score.probability()
    }
}

/// Which detection rule settled the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    /// Initial default before any rule fires.
    Baseline,
    WaterPresent,
    CoastalStorm,
    RiverBasin,
    UrbanWaterfront,
    NoWaterVisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionOutcome {
    pub level: RiskLevel,
    /// Fixed literal per rule, not derived from a numeric score.
    pub probability: &'static str,
    pub rule: DetectionRule,
}

/// Result of scoring a [`SignalSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Scored {
    Manual(ManualScore),
    Detection(DetectionOutcome),
    /// Image dominated by people or vehicles; risk is not judged.
    NotTerrain,
}

impl Scored {
    pub fn level(&self) -> RiskLevel {
        match self {
            Scored::Manual(score) => score.level(),
            Scored::Detection(outcome) => outcome.level,
            Scored::NotTerrain => RiskLevel::Unknown,
        }
    }

    pub fn probability(&self) -> String {
        match self {
            Scored::Manual(score) => score.probability(),
            Scored::Detection(outcome) => outcome.probability.to_string(),
            Scored::NotTerrain => "N/A".to_string(),
        }
    }
}

/// Score a signal set. Pure: identical inputs always give identical output.
pub fn score(signals: &SignalSet) -> Scored {
    match &signals.measurements {
        Measurements::Manual(manual) => {
            Scored::Manual(score_manual(manual, signals.region, signals.season))
        }
        Measurements::Detection(detection) => {
            if !detection.counts.is_terrain_image() {
                return Scored::NotTerrain;
            }
            Scored::Detection(detection_cascade(
                &detection.counts,
                signals.region,
                signals.season,
            ))
        }
    }
}

pub fn score_manual(signals: &ManualSignals, region: Region, season: Season) -> ManualScore {
    let mut components = Vec::with_capacity(6);

    let water = (signals.water_level * WATER_LEVEL_POINTS_PER_METRE).min(WATER_LEVEL_CAP);
    components.push(ScoreComponent {
        factor: Factor::WaterLevel,
        points: water,
        notes: format!(
            "water level {:.2} m (capped at {WATER_LEVEL_CAP})",
            signals.water_level
        ),
    });

    let rain = (signals.rainfall * RAINFALL_POINTS_PER_MM).min(RAINFALL_CAP);
    components.push(ScoreComponent {
        factor: Factor::Rainfall,
        points: rain,
        notes: format!(
            "rainfall {:.1} mm (capped at {RAINFALL_CAP})",
            signals.rainfall
        ),
    });

    let terrain = match signals.terrain {
        Terrain::Flat => 15.0,
        Terrain::Urban => 20.0,
        Terrain::Rural => 10.0,
        Terrain::Unknown => 0.0,
    };
    components.push(ScoreComponent {
        factor: Factor::Terrain,
        points: terrain,
        notes: format!("{} terrain", signals.terrain.as_str()),
    });

    let soil = match signals.soil {
        Soil::Saturated => 25.0,
        Soil::Moist => 10.0,
        Soil::Dry | Soil::Unknown => 0.0,
    };
    components.push(ScoreComponent {
        factor: Factor::Soil,
        points: soil,
        notes: format!("{} soil", signals.soil.as_str()),
    });

    let region_points = match region {
        Region::Coastal => 15.0,
        Region::River => 10.0,
        Region::Inland | Region::Unknown => 0.0,
    };
    components.push(ScoreComponent {
        factor: Factor::Region,
        points: region_points,
        notes: format!("{region} region"),
    });

    let season_points = match season {
        Season::Spring => 10.0,
        Season::Summer => 5.0,
        Season::Fall | Season::Winter | Season::Unknown => 0.0,
    };
    components.push(ScoreComponent {
        factor: Factor::Season,
        points: season_points,
        notes: format!("{season} season"),
    });

    let raw_total: f64 = components.iter().map(|c| c.points).sum();

    ManualScore {
        score: RiskScore::new(raw_total.min(MAX_SCORE)),
        raw_total,
        components,
    }
}

/// Detection-path rule cascade.
///
/// 1. Default Low / 15%.
/// 2. Any water body raises to Moderate / 40%; coastal summer then High / 70%,
///    otherwise a river region gives "Moderate to High" / 55%.
/// 3. Buildings next to water force High / 75%, overriding step 2.
/// 4. No water: only the narrative changes, the step-1 default stands.
pub fn detection_cascade(counts: &DetectionCounts, region: Region, season: Season) -> DetectionOutcome {
    let mut outcome = DetectionOutcome {
        level: RiskLevel::LOW,
        probability: "15%",
        rule: DetectionRule::Baseline,
    };

    if counts.water_body > 0 {
        outcome = DetectionOutcome {
            level: RiskLevel::MODERATE,
            probability: "40%",
            rule: DetectionRule::WaterPresent,
        };

        if region == Region::Coastal && season == Season::Summer {
            outcome = DetectionOutcome {
                level: RiskLevel::HIGH,
                probability: "70%",
                rule: DetectionRule::CoastalStorm,
            };
        } else if region == Region::River {
            outcome = DetectionOutcome {
                level: RiskLevel::ModerateToHigh,
                probability: "55%",
                rule: DetectionRule::RiverBasin,
            };
        }
    }

    if counts.building > 0 && counts.water_body > 0 {
        outcome = DetectionOutcome {
            level: RiskLevel::HIGH,
            probability: "75%",
            rule: DetectionRule::UrbanWaterfront,
        };
    }

    if counts.water_body == 0 {
        outcome.rule = DetectionRule::NoWaterVisible;
    }

    outcome
}
